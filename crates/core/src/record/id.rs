use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a string is not a valid record identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed record id {input:?}: {reason}")]
pub struct InvalidRecordId {
    pub input: String,
    pub reason: String,
}

/// Server-assigned record identifier.
///
/// Backed by a UUIDv7, whose canonical lowercase string form sorts in
/// creation order. The string form is also the cache key and the value
/// carried inside pagination cursors, so `Ord` on the id and lexicographic
/// order on its string form always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh, time-ordered identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID (useful for testing).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the canonical hyphenated form is accepted so that every id has
        // exactly one string representation (and one cache key).
        let uuid = Uuid::try_parse(s).map_err(|e| InvalidRecordId {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        if uuid.as_hyphenated().to_string() != s {
            return Err(InvalidRecordId {
                input: s.to_string(),
                reason: "expected canonical lowercase hyphenated form".to_string(),
            });
        }
        Ok(Self(uuid))
    }
}
