//! Type-erased access to a repository by collection name.

use async_trait::async_trait;
use serde_json::Value;

use bazaar_core::error::Result;
use bazaar_core::query::{Filter, Page, PageRequest};
use bazaar_core::record::{Entity, Record};
use bazaar_core::serialization::SerializationError;

use super::Repository;

/// A repository viewed through JSON values.
///
/// Lets tooling work with any collection without naming its entity type.
/// Entity fields travel as the flattened JSON object of each record.
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    fn collection(&self) -> &'static str;

    fn entity_type(&self) -> &'static str;

    /// Decodes `data` as the entity and creates it.
    async fn create_document(&self, data: Value) -> Result<Record<Value>>;

    async fn get_document(&self, id: &str) -> Result<Option<Record<Value>>>;

    async fn list_documents(&self, filter: &Filter, page: &PageRequest) -> Result<Page<Value>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
impl<T: Entity> CollectionHandle for Repository<T> {
    fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    fn entity_type(&self) -> &'static str {
        T::ENTITY_TYPE
    }

    async fn create_document(&self, data: Value) -> Result<Record<Value>> {
        let data: T = serde_json::from_value(data)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;
        let record = self.create(data).await?;
        to_value_record(record)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Record<Value>>> {
        self.get(id).await?.map(to_value_record).transpose()
    }

    async fn list_documents(&self, filter: &Filter, page: &PageRequest) -> Result<Page<Value>> {
        let page = self.list(filter, page).await?;
        let items = page
            .items
            .into_iter()
            .map(to_value_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page {
            items,
            total_count: page.total_count,
            has_previous_page: page.has_previous_page,
            has_next_page: page.has_next_page,
            start_cursor: page.start_cursor,
            end_cursor: page.end_cursor,
        })
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Repository::delete(self, id).await
    }
}

fn to_value_record<T: Entity>(record: Record<T>) -> Result<Record<Value>> {
    let Record {
        id,
        created_at,
        updated_at,
        deleted_at,
        data,
    } = record;
    let data =
        serde_json::to_value(data).map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
    Ok(Record {
        id,
        created_at,
        updated_at,
        deleted_at,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bazaar_core::clock::SystemClock;
    use bazaar_core::error::RepositoryError;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::cache::MemoryCache;
    use crate::events::{EventEmitter, TracingSink};
    use crate::repository::RepositoryOptions;
    use crate::storage::InMemoryStore;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Coupon {
        code: String,
        percent_off: u8,
    }

    impl Entity for Coupon {
        const COLLECTION: &'static str = "coupons";
        const TOPIC_PREFIX: &'static str = "coupon";
        const ENTITY_TYPE: &'static str = "Coupon";
    }

    fn handle() -> Arc<dyn CollectionHandle> {
        let (events, _worker) = EventEmitter::spawn(Arc::new(TracingSink));
        Arc::new(Repository::<Coupon>::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MemoryCache::new(16)),
            events,
            Arc::new(SystemClock),
            RepositoryOptions::default(),
        ))
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let handle = handle();
        assert_eq!(handle.collection(), "coupons");
        assert_eq!(handle.entity_type(), "Coupon");

        let created = handle
            .create_document(json!({"code": "SPRING", "percentOff": 15}))
            .await
            .unwrap();
        assert_eq!(created.data, json!({"code": "SPRING", "percentOff": 15}));

        let fetched = handle
            .get_document(&created.id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);

        let page = handle
            .list_documents(&Filter::new().eq("code", "SPRING"), &PageRequest::new())
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].id, created.id);

        assert!(handle.delete(&created.id.to_string()).await.unwrap());
        assert!(handle
            .get_document(&created.id.to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_shape() {
        let err = handle()
            .create_document(json!({"code": 7}))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
