//! SQL statements for the JSON document tables.
//!
//! Every collection is a table holding the primary key and the document
//! text. Table names are validated identifiers; values are always bound.

use bazaar_core::storage::{Result, StoreError};

/// Validates a collection name and returns it quoted for use in SQL.
pub fn table_name(collection: &str) -> Result<String> {
    let mut chars = collection.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::QueryFailed(format!(
            "invalid collection name: {collection:?}"
        )));
    }
    Ok(format!("\"{collection}\""))
}

pub fn create_table(table: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {table} (id TEXT PRIMARY KEY, doc TEXT NOT NULL)")
}

pub fn insert(table: &str) -> String {
    format!("INSERT INTO {table} (id, doc) VALUES (?1, ?2)")
}

pub fn select_docs(table: &str, where_sql: &str, limit_param: usize, offset_param: usize) -> String {
    format!(
        "SELECT doc FROM {table} WHERE {where_sql} ORDER BY id ASC LIMIT ?{limit_param} OFFSET ?{offset_param}"
    )
}

pub fn select_first(table: &str, where_sql: &str) -> String {
    format!("SELECT id, doc FROM {table} WHERE {where_sql} ORDER BY id ASC LIMIT 1")
}

pub fn count(table: &str, where_sql: &str) -> String {
    format!("SELECT COUNT(*) FROM {table} WHERE {where_sql}")
}

pub fn update_doc(table: &str) -> String {
    format!("UPDATE {table} SET doc = ?2 WHERE id = ?1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert_eq!(table_name("support_chats").unwrap(), "\"support_chats\"");
        assert_eq!(table_name("_private").unwrap(), "\"_private\"");
        assert!(table_name("").is_err());
        assert!(table_name("9lives").is_err());
        assert!(table_name("rides; DROP TABLE rides").is_err());
        assert!(table_name("ri\"des").is_err());
    }

    #[test]
    fn test_statements() {
        let table = table_name("orders").unwrap();
        assert_eq!(
            create_table(&table),
            "CREATE TABLE IF NOT EXISTS \"orders\" (id TEXT PRIMARY KEY, doc TEXT NOT NULL)"
        );
        assert_eq!(
            select_docs(&table, "1", 1, 2),
            "SELECT doc FROM \"orders\" WHERE 1 ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        );
        assert!(count(&table, "id = ?1").starts_with("SELECT COUNT(*)"));
    }
}
