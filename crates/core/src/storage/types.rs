use futures_util::stream::BoxStream;
use serde_json::Value;

use super::StoreError;

/// Stream of documents returned by [`DocumentStore::find`](super::DocumentStore::find).
pub type DocumentStream = BoxStream<'static, Result<Value, StoreError>>;

/// Skip and limit applied after sorting by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: u64,
    /// `None` returns every remaining document.
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn new(skip: u64, limit: Option<u64>) -> Self {
        Self { skip, limit }
    }
}
