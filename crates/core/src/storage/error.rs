use thiserror::Error;

use crate::error::RepositoryError;

/// Errors reported by a document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// A single stored document could not be decoded. List iteration skips
    /// these; every other error aborts it.
    #[error("Document decode failed: {0}")]
    Decode(String),
    #[error("Duplicate key in {collection}: {id}")]
    DuplicateKey { collection: String, id: String },
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl StoreError {
    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }

    /// Maps a failed read (find, count) to the repository error.
    pub fn into_read_error(self) -> RepositoryError {
        RepositoryError::StoreRead(self.to_string())
    }

    /// Maps a failed write (insert, replace, update) to the repository error.
    pub fn into_write_error(self) -> RepositoryError {
        RepositoryError::StoreWrite(self.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
