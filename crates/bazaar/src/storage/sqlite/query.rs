//! Compiles [`Filter`]s to SQL over JSON documents.
//!
//! Pure functions: no I/O. Every predicate becomes a boolean SQL expression
//! over `json_type`/`json_extract` of the `doc` column, with values and JSON
//! paths bound as parameters. Predicates on `id` with string operands use the
//! primary key column instead.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use bazaar_core::query::{Condition, Filter, Predicate};
use bazaar_core::record::ID_FIELD;
use bazaar_core::storage::{Result, StoreError};

/// A compiled `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl WhereClause {
    fn push(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("?{}", self.params.len())
    }
}

/// Compiles a filter into a `WHERE` clause. The empty filter compiles to `1`.
pub fn compile_filter(filter: &Filter) -> Result<WhereClause> {
    let mut clause = WhereClause {
        sql: String::new(),
        params: Vec::new(),
    };
    let mut parts = Vec::with_capacity(filter.predicates().len());
    for predicate in filter.predicates() {
        parts.push(compile_predicate(&mut clause, predicate)?);
    }
    clause.sql = if parts.is_empty() {
        "1".to_string()
    } else {
        parts.join(" AND ")
    };
    Ok(clause)
}

/// Converts a dotted field path to a quoted JSON path (`a.b` → `$."a"."b"`).
pub fn json_path(field: &str) -> Result<String> {
    let mut path = String::from("$");
    for segment in field.split('.') {
        if segment.is_empty() || segment.contains('"') {
            return Err(StoreError::QueryFailed(format!(
                "unsupported field path: {field:?}"
            )));
        }
        path.push_str(".\"");
        path.push_str(segment);
        path.push('"');
    }
    Ok(path)
}

fn compile_predicate(clause: &mut WhereClause, predicate: &Predicate) -> Result<String> {
    if predicate.field == ID_FIELD {
        if let Some(sql) = compile_id_predicate(clause, &predicate.condition) {
            return Ok(sql);
        }
    }

    // Rejected before binding the path so no parameter is left unused.
    if never_matches(&predicate.condition) {
        return Ok("0".to_string());
    }

    let path = clause.push(SqlValue::Text(json_path(&predicate.field)?));
    let field = Field { path: &path };

    let sql = match &predicate.condition {
        Condition::Eq(Value::Null) | Condition::Exists(false) => field.missing(),
        Condition::Ne(Value::Null) | Condition::Exists(true) => format!("NOT {}", field.missing()),
        Condition::Eq(expected) => field.equals(clause, expected),
        Condition::Ne(expected) => {
            format!("NOT COALESCE({}, 0)", field.equals(clause, expected))
        }
        Condition::Gt(bound) => field.compare(clause, ">", bound),
        Condition::Gte(bound) => field.compare(clause, ">=", bound),
        Condition::Lt(bound) => field.compare(clause, "<", bound),
        Condition::Lte(bound) => field.compare(clause, "<=", bound),
        Condition::In(values) => {
            let alternatives: Vec<String> = values
                .iter()
                .map(|value| match value {
                    Value::Null => field.missing(),
                    other => field.equals(clause, other),
                })
                .collect();
            format!("({})", alternatives.join(" OR "))
        }
    };
    Ok(sql)
}

fn never_matches(condition: &Condition) -> bool {
    match condition {
        Condition::Gt(bound) | Condition::Gte(bound) | Condition::Lt(bound) | Condition::Lte(bound) => {
            !(bound.is_number() || bound.is_string())
        }
        Condition::In(values) => values.is_empty(),
        _ => false,
    }
}

fn compile_id_predicate(clause: &mut WhereClause, condition: &Condition) -> Option<String> {
    let (op, value) = match condition {
        Condition::Eq(Value::String(s)) => ("=", s),
        Condition::Gt(Value::String(s)) => (">", s),
        Condition::Gte(Value::String(s)) => (">=", s),
        Condition::Lt(Value::String(s)) => ("<", s),
        Condition::Lte(Value::String(s)) => ("<=", s),
        _ => return None,
    };
    let param = clause.push(SqlValue::Text(value.clone()));
    Some(format!("id {op} {param}"))
}

struct Field<'a> {
    path: &'a str,
}

impl Field<'_> {
    fn kind(&self) -> String {
        format!("json_type(doc, {})", self.path)
    }

    fn value(&self) -> String {
        format!("json_extract(doc, {})", self.path)
    }

    /// Absent or JSON `null`.
    fn missing(&self) -> String {
        format!("COALESCE({} = 'null', 1)", self.kind())
    }

    fn equals(&self, clause: &mut WhereClause, expected: &Value) -> String {
        let (kind, value) = (self.kind(), self.value());
        match expected {
            Value::Null => self.missing(),
            Value::Bool(true) => format!("{kind} = 'true'"),
            Value::Bool(false) => format!("{kind} = 'false'"),
            Value::Number(n) => {
                let param = clause.push(number_param(n));
                format!("({kind} IN ('integer', 'real') AND {value} = {param})")
            }
            Value::String(s) => {
                let param = clause.push(SqlValue::Text(s.clone()));
                format!("({kind} = 'text' AND {value} = {param})")
            }
            Value::Array(_) | Value::Object(_) => {
                let param = clause.push(SqlValue::Text(expected.to_string()));
                format!("({kind} IN ('array', 'object') AND json({value}) = json({param}))")
            }
        }
    }

    fn compare(&self, clause: &mut WhereClause, op: &str, bound: &Value) -> String {
        let (kind, value) = (self.kind(), self.value());
        match bound {
            Value::Number(n) => {
                let param = clause.push(number_param(n));
                format!("({kind} IN ('integer', 'real') AND {value} {op} {param})")
            }
            Value::String(s) => {
                let param = clause.push(SqlValue::Text(s.clone()));
                format!("({kind} = 'text' AND {value} {op} {param})")
            }
            _ => "0".to_string(),
        }
    }
}

fn number_param(n: &serde_json::Number) -> SqlValue {
    match n.as_i64() {
        Some(i) => SqlValue::Integer(i),
        None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
    }
}
