use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::query::Filter;
use crate::record::UpdateOutcome;

use super::{DocumentStream, FindOptions, Result};

/// Schemaless document database.
///
/// Documents are JSON objects whose `id` field is the primary key. Every
/// operation addresses a named collection; implementations create collections
/// on first use.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document. Fails with `DuplicateKey` if the id exists.
    async fn insert_one(&self, collection: &str, document: Value) -> Result<()>;

    /// Returns one document matching the filter.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>>;

    /// Counts documents matching the filter.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Streams documents matching the filter in ascending id order.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<DocumentStream>;

    /// Atomically replaces the first document matching the filter and returns
    /// the stored document after replacement, or `None` when nothing matched.
    async fn find_one_and_replace(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Value,
    ) -> Result<Option<Value>>;

    /// Atomically sets fields on the first document matching the filter.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome>;
}
