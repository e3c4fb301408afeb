//! The generic soft-deleting, cache-through repository.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Map;
use tokio::time::Instant;

use bazaar_core::cache::{record_key, Cache, CacheError, Result as CacheResult};
use bazaar_core::clock::Clock;
use bazaar_core::error::{RepositoryError, Result};
use bazaar_core::events::{topic, DeletedPayload, EventVerb};
use bazaar_core::query::{
    compose_filter, compute_window, live_record_filter, Filter, Page, PageRequest, PageWindow,
};
use bazaar_core::record::{Entity, Record, RecordId, DELETED_AT_FIELD};
use bazaar_core::serialization::{
    deserialize_record, from_document, serialize_record, to_document, SerializationError,
};
use bazaar_core::storage::{DocumentStore, FindOptions, StoreError};

use super::options::{CacheReadPolicy, RepositoryOptions};
use crate::events::EventEmitter;

/// Create, read, list, update, and soft-delete for one entity type.
///
/// Every read goes through the cache, every mutation invalidates it, and every
/// successful mutation submits a `<prefix>.<verb>` event. Tombstoned records
/// are invisible to `get`, `list`, `update`, and `delete`.
///
/// The repository holds no mutable state; clones share the same collaborators.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn Cache>,
    events: EventEmitter,
    clock: Arc<dyn Clock>,
    options: RepositoryOptions,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            events: self.events.clone(),
            clock: Arc::clone(&self.clock),
            options: self.options,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn Cache>,
        events: EventEmitter,
        clock: Arc<dyn Clock>,
        options: RepositoryOptions,
    ) -> Self {
        Self {
            store,
            cache,
            events,
            clock,
            options,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Persists a new record wrapping `data`.
    ///
    /// Assigns a fresh id and sets both timestamps to now. The cache write and
    /// the `<prefix>.created` event are best effort.
    pub async fn create(&self, data: T) -> Result<Record<T>> {
        let record = Record::new(RecordId::new(), self.clock.now(), data);
        let document = to_document(&record)?;

        deadline(
            "insert",
            self.options.write_timeout,
            self.store.insert_one(T::COLLECTION, document),
        )
        .await?
        .map_err(StoreError::into_write_error)?;

        self.cache_record(&record).await;
        self.emit(EventVerb::Created.as_str(), &record);

        tracing::debug!(
            collection = T::COLLECTION,
            record_id = %record.id,
            "Record created"
        );
        Ok(record)
    }

    /// Fetches a live record by id.
    ///
    /// Returns `Ok(None)` for unknown and tombstoned ids. A malformed id is
    /// `InvalidArgument`.
    pub async fn get(&self, id: &str) -> Result<Option<Record<T>>> {
        let id: RecordId = id.parse()?;
        self.get_by_id(&id).await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record<T>>> {
        let key = record_key(id);

        let cached = match self.bounded_cache(self.cache.get(&key)).await {
            Ok(cached) => cached,
            Err(err) => {
                tracing::warn!(record_id = %id, error = %err, "Failed to read cache");
                None
            }
        };

        if self.options.read_policy == CacheReadPolicy::TrustCache {
            if let Some(bytes) = &cached {
                match deserialize_record::<T>(bytes) {
                    Ok(record) if !record.is_deleted() => {
                        tracing::trace!(record_id = %id, "Cache hit for record");
                        return Ok(Some(record));
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(
                            record_id = %id,
                            error = %err,
                            "Cache entry deserialization failed"
                        );
                    }
                }
            }
        }

        tracing::trace!(record_id = %id, cached = cached.is_some(), "Reading record from store");
        let document = deadline(
            "find_one",
            self.options.read_timeout,
            self.store.find_one(T::COLLECTION, &live_record_filter(id)),
        )
        .await?
        .map_err(StoreError::into_read_error)?;

        let Some(document) = document else {
            if cached.is_some() {
                if let Err(err) = self.bounded_cache(self.cache.delete(&key)).await {
                    tracing::warn!(record_id = %id, error = %err, "Failed to evict stale cache entry");
                }
            }
            return Ok(None);
        };

        let record: Record<T> = from_document(document)?;
        match serialize_record(&record) {
            Ok(bytes) if cached.as_deref() != Some(bytes.as_slice()) => {
                self.write_cache(id, &bytes).await;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(record_id = %id, error = %err, "Failed to serialize record for cache");
            }
        }

        Ok(Some(record))
    }

    /// Lists live records matching `filter`, one page at a time.
    ///
    /// Records are ordered by ascending id. `total_count` counts every live
    /// record matching `filter` regardless of cursors. Documents that fail to
    /// decode are logged and skipped.
    pub async fn list(&self, filter: &Filter, page: &PageRequest) -> Result<Page<T>> {
        let bounds = page.validate()?;

        let total_count = self.count(&compose_filter(filter, None, None)).await?;
        let effective = compose_filter(filter, bounds.after.as_ref(), bounds.before.as_ref());
        let window_count = if bounds.is_crossed() {
            0
        } else if bounds.has_cursor() {
            self.count(&effective).await?
        } else {
            total_count
        };

        let window = compute_window(bounds.first, bounds.last, window_count);
        if window_count == 0 || window.is_empty() {
            return Ok(Page::new(Vec::new(), total_count, &window));
        }

        let items = self.fetch_window(&effective, &window).await?;

        tracing::trace!(
            collection = T::COLLECTION,
            returned = items.len(),
            total_count,
            "Listed records"
        );
        Ok(Page::new(items, total_count, &window))
    }

    /// Replaces a live record and returns the stored state.
    ///
    /// Sets `updated_at` to now. The caller keeps `id`, `created_at`, and
    /// `deleted_at` as read. Never creates: an unknown or tombstoned id is
    /// `NotFound`.
    pub async fn update(&self, record: Record<T>) -> Result<Record<T>> {
        let mut record = record;
        record.updated_at = self.clock.now();
        let document = to_document(&record)?;

        let replaced = deadline(
            "update",
            self.options.write_timeout,
            self.store
                .find_one_and_replace(T::COLLECTION, &live_record_filter(&record.id), document),
        )
        .await?
        .map_err(StoreError::into_write_error)?;

        let Some(replaced) = replaced else {
            return Err(RepositoryError::NotFound {
                entity_type: T::ENTITY_TYPE,
                id: record.id.to_string(),
            });
        };
        let updated: Record<T> = from_document(replaced)?;

        self.invalidate(&updated.id).await;
        self.emit(EventVerb::Updated.as_str(), &updated);

        tracing::debug!(
            collection = T::COLLECTION,
            record_id = %updated.id,
            "Record updated"
        );
        Ok(updated)
    }

    /// Tombstones a live record.
    ///
    /// Returns `true` only when exactly one document matched and was modified.
    /// Unknown and already deleted ids return `false` and emit nothing.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id: RecordId = id.parse()?;
        self.delete_by_id(&id).await
    }

    pub async fn delete_by_id(&self, id: &RecordId) -> Result<bool> {
        let deleted_at = serde_json::to_value(self.clock.now())
            .map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
        let mut set = Map::new();
        set.insert(DELETED_AT_FIELD.to_string(), deleted_at);

        let outcome = deadline(
            "delete",
            self.options.write_timeout,
            self.store
                .update_one(T::COLLECTION, &live_record_filter(id), set),
        )
        .await?
        .map_err(StoreError::into_write_error)?;

        if !outcome.is_single_change() {
            tracing::debug!(
                collection = T::COLLECTION,
                record_id = %id,
                matched = outcome.matched_count,
                modified = outcome.modified_count,
                "Delete changed nothing"
            );
            return Ok(false);
        }

        self.invalidate(id).await;
        self.emit(
            EventVerb::Deleted.as_str(),
            &DeletedPayload { id: *id, outcome },
        );

        tracing::debug!(collection = T::COLLECTION, record_id = %id, "Record deleted");
        Ok(true)
    }

    /// Submits `<prefix>.<verb>` without waiting for delivery.
    ///
    /// Used directly for domain topics such as `order.status_changed`.
    pub fn emit<P: Serialize + ?Sized>(&self, verb: &str, payload: &P) {
        self.events.emit(topic(T::TOPIC_PREFIX, verb), payload);
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        deadline(
            "count",
            self.options.read_timeout,
            self.store.count(T::COLLECTION, filter),
        )
        .await?
        .map_err(StoreError::into_read_error)
    }

    async fn fetch_window(&self, filter: &Filter, window: &PageWindow) -> Result<Vec<Record<T>>> {
        let mut stream = deadline(
            "find",
            self.options.read_timeout,
            self.store.find(
                T::COLLECTION,
                filter,
                FindOptions::new(window.skip, window.limit),
            ),
        )
        .await?
        .map_err(StoreError::into_read_error)?;

        let until = Instant::now() + self.options.list_timeout;
        let mut items = Vec::new();
        loop {
            let next = tokio::time::timeout_at(until, stream.next())
                .await
                .map_err(|_| RepositoryError::Timeout {
                    operation: "list",
                    after: self.options.list_timeout,
                })?;

            match next {
                None => break,
                Some(Ok(document)) => match from_document::<T>(document) {
                    Ok(record) => items.push(record),
                    Err(err) => {
                        tracing::warn!(
                            collection = T::COLLECTION,
                            error = %err,
                            "Skipping undecodable record"
                        );
                    }
                },
                Some(Err(err)) if err.is_decode() => {
                    tracing::warn!(
                        collection = T::COLLECTION,
                        error = %err,
                        "Skipping undecodable record"
                    );
                }
                Some(Err(err)) => return Err(err.into_read_error()),
            }
        }
        Ok(items)
    }

    async fn cache_record(&self, record: &Record<T>) {
        match serialize_record(record) {
            Ok(bytes) => self.write_cache(&record.id, &bytes).await,
            Err(err) => {
                tracing::warn!(record_id = %record.id, error = %err, "Failed to serialize record for cache");
            }
        }
    }

    async fn write_cache(&self, id: &RecordId, bytes: &[u8]) {
        let key = record_key(id);
        let ttl = Some(self.options.cache_ttl);
        if let Err(err) = self.bounded_cache(self.cache.set(&key, bytes, ttl)).await {
            tracing::warn!(record_id = %id, error = %err, "Failed to cache record");
        }
    }

    async fn invalidate(&self, id: &RecordId) {
        let key = record_key(id);
        if let Err(err) = self.bounded_cache(self.cache.delete(&key)).await {
            tracing::warn!(record_id = %id, error = %err, "Failed to invalidate record cache");
        }
    }

    async fn bounded_cache<R>(&self, op: impl Future<Output = CacheResult<R>>) -> CacheResult<R> {
        let after = self.options.read_timeout;
        tokio::time::timeout(after, op).await.unwrap_or_else(|_| {
            Err(CacheError::OperationFailed(format!("timed out after {after:?}")))
        })
    }
}

async fn deadline<F: Future>(operation: &'static str, after: Duration, fut: F) -> Result<F::Output> {
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| RepositoryError::Timeout { operation, after })
}
