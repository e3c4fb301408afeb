//! SQLite document store implementation.
//!
//! Implements `DocumentStore` with one table per collection, each row holding
//! the primary key and the JSON document text.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use rusqlite::OptionalExtension;
use serde_json::{Map, Value};
use tokio_rusqlite::Connection;

use bazaar_core::query::Filter;
use bazaar_core::record::{UpdateOutcome, ID_FIELD};
use bazaar_core::storage::{DocumentStore, DocumentStream, FindOptions, Result, StoreError};

use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::query::compile_filter;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn ensure_table(conn: &rusqlite::Connection, table: &str) -> tokio_rusqlite::Result<()> {
    conn.execute_batch(&schema::create_table(table))
        .map_err(wrap_err)
}

fn document_id(document: &Value) -> Result<String> {
    if !document.is_object() {
        return Err(StoreError::InvalidDocument(
            "document must be a JSON object".to_string(),
        ));
    }
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidDocument("document has no string id".to_string()))
}

fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| StoreError::Decode(e.to_string()))
}

fn to_sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// SQLite-backed document store.
///
/// Tables are created on first use. Single-document replace and update run
/// inside a transaction on the connection's worker thread.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database. Data is lost when the store is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        let table = schema::table_name(collection)?;
        let id = document_id(&document)?;
        let doc = document.to_string();
        let row_id = id.clone();

        self.conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                conn.execute(&schema::insert(&table), rusqlite::params![row_id, doc])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, collection, Some(&id)))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let table = schema::table_name(collection)?;
        let clause = compile_filter(filter)?;

        let doc: Option<String> = self
            .conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                let mut stmt = conn
                    .prepare(&schema::select_first(&table, &clause.sql))
                    .map_err(wrap_err)?;
                stmt.query_row(rusqlite::params_from_iter(clause.params.iter()), |row| {
                    row.get::<_, String>(1)
                })
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?;

        doc.as_deref().map(decode).transpose()
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let table = schema::table_name(collection)?;
        let clause = compile_filter(filter)?;

        let count: i64 = self
            .conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                let mut stmt = conn
                    .prepare(&schema::count(&table, &clause.sql))
                    .map_err(wrap_err)?;
                stmt.query_row(rusqlite::params_from_iter(clause.params.iter()), |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<DocumentStream> {
        let table = schema::table_name(collection)?;
        let mut clause = compile_filter(filter)?;
        // LIMIT -1 means no limit in SQLite.
        let limit = options.limit.map_or(-1, to_sql_int);
        clause.params.push(rusqlite::types::Value::Integer(limit));
        clause
            .params
            .push(rusqlite::types::Value::Integer(to_sql_int(options.skip)));
        let sql = schema::select_docs(
            &table,
            &clause.sql,
            clause.params.len() - 1,
            clause.params.len(),
        );

        let docs: Vec<String> = self
            .conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(clause.params.iter()), |row| {
                        row.get::<_, String>(0)
                    })
                    .map_err(wrap_err)?;

                let mut docs = Vec::new();
                for row in rows {
                    docs.push(row.map_err(wrap_err)?);
                }
                Ok(docs)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?;

        Ok(stream::iter(docs.into_iter().map(|text| decode(&text))).boxed())
    }

    async fn find_one_and_replace(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Value,
    ) -> Result<Option<Value>> {
        let table = schema::table_name(collection)?;
        let clause = compile_filter(filter)?;
        let replacement_id = document_id(&replacement)?;
        let expected_id = replacement_id.clone();
        let doc = replacement.to_string();

        let matched: Option<String> = self
            .conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                let tx = conn.transaction().map_err(wrap_err)?;
                let matched: Option<String> = {
                    let mut stmt = tx
                        .prepare(&schema::select_first(&table, &clause.sql))
                        .map_err(wrap_err)?;
                    stmt.query_row(rusqlite::params_from_iter(clause.params.iter()), |row| {
                        row.get(0)
                    })
                    .optional()
                    .map_err(wrap_err)?
                };
                if matched.as_deref() == Some(replacement_id.as_str()) {
                    tx.execute(&schema::update_doc(&table), rusqlite::params![replacement_id, doc])
                        .map_err(wrap_err)?;
                    tx.commit().map_err(wrap_err)?;
                }
                Ok(matched)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?;

        match matched {
            None => Ok(None),
            Some(id) if id == expected_id => Ok(Some(replacement)),
            Some(id) => Err(StoreError::InvalidDocument(format!(
                "replacement id does not match {id}"
            ))),
        }
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome> {
        let table = schema::table_name(collection)?;
        let clause = compile_filter(filter)?;

        self.conn
            .call(move |conn| {
                ensure_table(conn, &table)?;
                let tx = conn.transaction().map_err(wrap_err)?;
                let matched: Option<(String, String)> = {
                    let mut stmt = tx
                        .prepare(&schema::select_first(&table, &clause.sql))
                        .map_err(wrap_err)?;
                    stmt.query_row(rusqlite::params_from_iter(clause.params.iter()), |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })
                    .optional()
                    .map_err(wrap_err)?
                };
                let Some((id, text)) = matched else {
                    return Ok(Ok(UpdateOutcome::default()));
                };
                let mut fields = match serde_json::from_str::<Value>(&text) {
                    Ok(Value::Object(fields)) => fields,
                    Ok(_) => {
                        return Ok(Err(StoreError::Decode(format!(
                            "document {id} is not an object"
                        ))))
                    }
                    Err(e) => return Ok(Err(StoreError::Decode(e.to_string()))),
                };

                let mut modified = false;
                for (key, value) in set {
                    if fields.get(&key) != Some(&value) {
                        fields.insert(key, value);
                        modified = true;
                    }
                }
                if modified {
                    let doc = Value::Object(fields).to_string();
                    tx.execute(&schema::update_doc(&table), rusqlite::params![id, doc])
                        .map_err(wrap_err)?;
                    tx.commit().map_err(wrap_err)?;
                }
                Ok(Ok(UpdateOutcome::new(1, u64::from(modified))))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?
    }
}
