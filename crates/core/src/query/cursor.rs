//! Opaque pagination cursors.
//!
//! A cursor is the canonical id string of a record, base64 encoded with the
//! URL-safe alphabet and no padding. Callers must treat it as opaque.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

use crate::error::RepositoryError;
use crate::record::{InvalidRecordId, RecordId};

/// Errors from decoding a cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Encoding(String),
    #[error("cursor does not contain a record id: {0}")]
    Payload(String),
}

impl From<CursorError> for RepositoryError {
    fn from(err: CursorError) -> Self {
        RepositoryError::InvalidCursor(err.to_string())
    }
}

/// Encodes the cursor for a record id.
pub fn encode_cursor(id: &RecordId) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Decodes a cursor back into the record id it points at.
pub fn decode_cursor(cursor: &str) -> Result<RecordId, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|e| CursorError::Encoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| CursorError::Payload(e.to_string()))?;
    text.parse()
        .map_err(|e: InvalidRecordId| CursorError::Payload(e.to_string()))
}
