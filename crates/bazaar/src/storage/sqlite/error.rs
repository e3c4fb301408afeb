//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StoreError`.
//! Primary key violations become `DuplicateKey`.

use bazaar_core::storage::StoreError;

/// Maps a rusqlite error to a StoreError.
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `DuplicateKey`
/// - Cannot open database → `ConnectionFailed`
/// - All other errors → `QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, collection: &str, id: Option<&str>) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateKey {
                collection: collection.to_string(),
                id: id.unwrap_or("unknown").to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StoreError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StoreError.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error, collection: &str) -> StoreError {
    map_tokio_rusqlite_error_with_id(err, collection, None)
}

/// Maps a tokio_rusqlite error, reporting `id` on key violations.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    collection: &str,
    id: Option<&str>,
) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, collection, id)
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}
