use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Document field holding the record id.
pub const ID_FIELD: &str = "id";
/// Document field holding the insert timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Document field holding the last replace timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";
/// Document field whose presence marks a tombstone.
pub const DELETED_AT_FIELD: &str = "deletedAt";

/// Field names owned by [`Record`]; entity schemas must not reuse them.
pub const RESERVED_FIELDS: [&str; 4] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD, DELETED_AT_FIELD];

/// A persisted entity type.
///
/// The declaration carries only the schema (the implementing type and its
/// serde representation), the collection it lives in, and the prefix used for
/// its event topics. Everything else is derived by the generic repository.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Document store collection name.
    const COLLECTION: &'static str;
    /// Prefix for `<prefix>.<verb>` event topics.
    const TOPIC_PREFIX: &'static str;
    /// Human readable type name used in errors and logs.
    const ENTITY_TYPE: &'static str;
}

/// The common record shape wrapping entity-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Record<T> {
    /// Creates a fresh record with `created_at == updated_at == now`.
    pub fn new(id: RecordId, now: DateTime<Utc>, data: T) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            data,
        }
    }

    /// Returns true if this record carries a tombstone.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Replaces the entity-specific fields, keeping the record metadata.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = data;
        self
    }

    /// Maps the entity-specific fields, keeping the record metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Record<U> {
        Record {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            data: f(self.data),
        }
    }
}

/// Acknowledgment of a single-document update, as reported by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            matched_count,
            modified_count,
        }
    }

    /// True when exactly one document matched and exactly one was modified.
    pub fn is_single_change(&self) -> bool {
        self.matched_count == 1 && self.modified_count == 1
    }
}
