use crate::record::RecordId;

/// Returns the cache key for a record.
///
/// The key is exactly the canonical id string. Ids are globally unique, so
/// every entity type shares one key namespace.
pub fn record_key(id: &RecordId) -> String {
    id.to_string()
}
