//! Pure functions converting records to and from their stored forms.
//!
//! The cache holds JSON bytes and the document store holds JSON documents.
//! Both encodings are self-describing; decoding is strict on field types and
//! ignores unknown fields.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::RepositoryError;
use crate::record::Record;

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for RepositoryError {
    fn from(err: SerializationError) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a record to cache bytes.
pub fn serialize_record<T: Serialize>(record: &Record<T>) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes cache bytes to a record.
pub fn deserialize_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<Record<T>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Converts a record to a store document.
///
/// Fails if the entity does not serialize to a JSON object, since the record
/// fields are flattened into the same document.
pub fn to_document<T: Serialize>(record: &Record<T>) -> Result<Value> {
    let value =
        serde_json::to_value(record).map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
    if !value.is_object() {
        return Err(SerializationError::SerializeFailed(
            "record did not serialize to an object".to_string(),
        ));
    }
    Ok(value)
}

/// Converts a store document to a record.
pub fn from_document<T: DeserializeOwned>(document: Value) -> Result<Record<T>> {
    serde_json::from_value(document)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
