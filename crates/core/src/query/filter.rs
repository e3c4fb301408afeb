//! Typed document filters and the soft-delete filter composer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{RecordId, DELETED_AT_FIELD, ID_FIELD};

/// A condition applied to one document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    /// `Exists(false)` matches absent and `null` fields.
    Exists(bool),
}

/// A condition bound to a dotted field path (e.g. `"pickup.city"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }
}

/// An ordered conjunction of predicates.
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Appends a predicate.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Eq(value.into())))
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Ne(value.into())))
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Gt(value.into())))
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Gte(value.into())))
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Lt(value.into())))
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::new(field, Condition::Lte(value.into())))
    }

    pub fn is_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.and(Predicate::new(field, Condition::In(values)))
    }

    pub fn exists(self, field: impl Into<String>, present: bool) -> Self {
        self.and(Predicate::new(field, Condition::Exists(present)))
    }
}

impl FromIterator<Predicate> for Filter {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

/// Builds the filter selecting a single live record by id.
pub fn live_record_filter(id: &RecordId) -> Filter {
    compose_filter(&Filter::new().eq(ID_FIELD, id.to_string()), None, None)
}

/// Composes the effective filter passed to the store.
///
/// The caller's predicates come first and keep their order, followed by the
/// `deletedAt absent` predicate and then the optional cursor bounds. Because
/// the result is a conjunction, a caller predicate on `deletedAt` can only
/// narrow the result further; tombstones never match.
pub fn compose_filter(
    caller: &Filter,
    after: Option<&RecordId>,
    before: Option<&RecordId>,
) -> Filter {
    let mut filter = caller.clone().exists(DELETED_AT_FIELD, false);
    if let Some(after) = after {
        filter = filter.gt(ID_FIELD, after.to_string());
    }
    if let Some(before) = before {
        filter = filter.lt(ID_FIELD, before.to_string());
    }
    filter
}
