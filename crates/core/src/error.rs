use std::time::Duration;

use thiserror::Error;

use crate::record::InvalidRecordId;

/// Errors surfaced by repository operations.
///
/// Cache and event failures never appear here: they are recovered locally.
/// A missing record on read is `Ok(None)`, not [`RepositoryError::NotFound`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Store write failed: {0}")]
    StoreWrite(String),
    #[error("Store read failed: {0}")]
    StoreRead(String),
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Returns true for errors caused by caller input (malformed id, cursor,
    /// or page size).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            RepositoryError::InvalidArgument(_) | RepositoryError::InvalidCursor(_)
        )
    }
}

impl From<InvalidRecordId> for RepositoryError {
    fn from(err: InvalidRecordId) -> Self {
        RepositoryError::InvalidArgument(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
