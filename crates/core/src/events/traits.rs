use async_trait::async_trait;

use super::{Event, Result};

/// Destination for published events.
///
/// Called from the emitter's background worker, one event at a time in
/// submission order.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<()>;
}
