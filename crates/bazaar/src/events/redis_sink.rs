//! Redis pub/sub event sink.

use async_trait::async_trait;
use redis::AsyncCommands;

use bazaar_core::events::{Event, EventError, EventSink, Result};

use crate::cache::redis_impl::map_redis_error;

/// Publishes each event as JSON on the Redis channel named after its topic.
#[derive(Clone)]
pub struct RedisEventSink {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisEventSink {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `EventError::PublishFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| EventError::PublishFailed(map_redis_error(e).to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| EventError::PublishFailed(map_redis_error(e).to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl EventSink for RedisEventSink {
    async fn publish(&self, event: &Event) -> Result<()> {
        let payload =
            serde_json::to_string(event).map_err(|e| EventError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&event.topic, &payload)
            .await
            .map_err(|e| EventError::PublishFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;
    use std::time::Duration;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    async fn test_redis_publish_and_receive() {
        let Ok(sink) = RedisEventSink::new(&redis_url()).await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let Ok(client) = redis::Client::open(redis_url()) else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let topic = format!("test_{}.created", uuid::Uuid::now_v7().simple());
        let mut pubsub = client.get_async_pubsub().await.unwrap();
        pubsub.subscribe(&topic).await.unwrap();

        let event = Event::new(topic.clone(), json!({"id": "abc"}));
        sink.publish(&event).await.unwrap();

        let mut stream = pubsub.on_message();
        let msg = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("Timeout waiting for event")
            .expect("Stream ended");
        let payload: String = msg.get_payload().unwrap();
        let received: Event = serde_json::from_str(&payload).unwrap();

        assert_eq!(received, event);
    }
}
