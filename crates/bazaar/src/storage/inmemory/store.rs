//! In-memory document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use bazaar_core::query::Filter;
use bazaar_core::record::{UpdateOutcome, ID_FIELD};
use bazaar_core::storage::{DocumentStore, DocumentStream, FindOptions, Result, StoreError};

type Collection = BTreeMap<String, Value>;

/// In-memory document store for tests and local development.
///
/// Each collection is a `BTreeMap` keyed by the id string, so iteration order
/// is ascending id order. Data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection, tombstones included.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn document_id(document: &Value) -> Result<String> {
    if !document.is_object() {
        return Err(StoreError::InvalidDocument(
            "document must be a JSON object".to_string(),
        ));
    }
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidDocument("document has no string id".to_string()))
}

fn first_match<'a>(collection: &'a Collection, filter: &Filter) -> Option<&'a String> {
    collection
        .iter()
        .find(|(_, doc)| filter.matches(doc))
        .map(|(id, _)| id)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        let id = document_id(&document)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id, document);
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.values().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map_or(0, |docs| docs.values().filter(|doc| filter.matches(doc)).count());
        Ok(count as u64)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<DocumentStream> {
        let collections = self.collections.read().await;
        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        let documents: Vec<Value> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(doc))
                    .skip(skip)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(stream::iter(documents.into_iter().map(Ok)).boxed())
    }

    async fn find_one_and_replace(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Value,
    ) -> Result<Option<Value>> {
        let replacement_id = document_id(&replacement)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(id) = first_match(docs, filter).cloned() else {
            return Ok(None);
        };
        if id != replacement_id {
            return Err(StoreError::InvalidDocument(format!(
                "replacement id {replacement_id} does not match {id}"
            )));
        }
        docs.insert(id, replacement.clone());
        Ok(Some(replacement))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        let Some(id) = first_match(docs, filter).cloned() else {
            return Ok(UpdateOutcome::default());
        };
        let Some(Value::Object(fields)) = docs.get_mut(&id) else {
            return Ok(UpdateOutcome::new(1, 0));
        };

        let mut modified = false;
        for (key, value) in set {
            if fields.get(&key) != Some(&value) {
                fields.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateOutcome::new(1, u64::from(modified)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use serde_json::json;

    const RIDES: &str = "rides";

    fn ride(id: &str, status: &str) -> Value {
        json!({"id": id, "status": status})
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        // Inserted out of order on purpose.
        for (id, status) in [("c", "completed"), ("a", "requested"), ("b", "requested")] {
            store.insert_one(RIDES, ride(id, status)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_insert_and_find_one() {
        let store = seeded().await;
        let found = store
            .find_one(RIDES, &Filter::new().eq("id", "b"))
            .await
            .unwrap();
        assert_eq!(found, Some(ride("b", "requested")));
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let store = seeded().await;
        let err = store.insert_one(RIDES, ride("a", "x")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateKey {
                collection: RIDES.to_string(),
                id: "a".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_insert_requires_string_id() {
        let store = InMemoryStore::new();
        let err = store
            .insert_one(RIDES, json!({"status": "requested"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_find_sorts_by_id_and_applies_skip_limit() {
        let store = seeded().await;

        let all: Vec<Value> = store
            .find(RIDES, &Filter::new(), FindOptions::default())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let page: Vec<Value> = store
            .find(RIDES, &Filter::new(), FindOptions::new(1, Some(1)))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(page, vec![ride("b", "requested")]);
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let store = seeded().await;
        let filter = Filter::new().eq("status", "requested");
        assert_eq!(store.count(RIDES, &filter).await.unwrap(), 2);
        assert_eq!(store.count("unknown", &filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_one_and_replace() {
        let store = seeded().await;
        let replaced = store
            .find_one_and_replace(RIDES, &Filter::new().eq("id", "a"), ride("a", "accepted"))
            .await
            .unwrap();
        assert_eq!(replaced, Some(ride("a", "accepted")));

        let missing = store
            .find_one_and_replace(RIDES, &Filter::new().eq("id", "z"), ride("z", "accepted"))
            .await
            .unwrap();
        assert!(missing.is_none());
        assert_eq!(store.len(RIDES).await, 3);
    }

    #[tokio::test]
    async fn test_replace_cannot_change_id() {
        let store = seeded().await;
        let err = store
            .find_one_and_replace(RIDES, &Filter::new().eq("id", "a"), ride("q", "accepted"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_update_one_reports_counts() {
        let store = seeded().await;
        let filter = Filter::new().eq("id", "a").exists("deletedAt", false);
        let mut set = Map::new();
        set.insert("deletedAt".to_string(), json!("2024-01-01T00:00:00Z"));

        let first = store.update_one(RIDES, &filter, set.clone()).await.unwrap();
        assert_eq!(first, UpdateOutcome::new(1, 1));

        // The filter no longer matches the tombstoned document.
        let second = store.update_one(RIDES, &filter, set.clone()).await.unwrap();
        assert_eq!(second, UpdateOutcome::new(0, 0));

        // Setting an identical value matches without modifying.
        let same = store
            .update_one(RIDES, &Filter::new().eq("id", "a"), set)
            .await
            .unwrap();
        assert_eq!(same, UpdateOutcome::new(1, 0));
    }
}
