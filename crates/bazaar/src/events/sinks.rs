//! In-process event sinks.

use async_trait::async_trait;
use tokio::sync::broadcast;

use bazaar_core::events::{Event, EventSink, Result};

/// Fans events out to in-process subscribers over a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<Event>,
}

impl BroadcastSink {
    /// Creates a sink whose subscribers may lag by at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventSink for BroadcastSink {
    async fn publish(&self, event: &Event) -> Result<()> {
        // No subscribers is not an error.
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

/// Writes every event to the log at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn publish(&self, event: &Event) -> Result<()> {
        tracing::info!(
            topic = %event.topic,
            emitted_at = %event.emitted_at,
            payload = %event.payload,
            "Event published"
        );
        Ok(())
    }
}
