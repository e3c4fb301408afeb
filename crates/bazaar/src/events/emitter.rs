//! Non-blocking event submission onto a background worker.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use bazaar_core::events::{Event, EventSink};

/// Handle used by repositories to submit events.
///
/// `emit` snapshots the payload and returns immediately; delivery happens on
/// a spawned task in submission order. Clones share the same worker.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: mpsc::UnboundedSender<Event>,
}

/// The background delivery task behind an [`EventEmitter`].
///
/// Dropping the worker does not stop delivery. Await [`EventWorker::finish`]
/// after every emitter clone is dropped to flush pending events.
#[derive(Debug)]
pub struct EventWorker {
    handle: JoinHandle<()>,
}

impl EventEmitter {
    /// Spawns the delivery task on the current tokio runtime.
    pub fn spawn(sink: Arc<dyn EventSink>) -> (Self, EventWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(deliver(rx, sink));
        (Self { tx }, EventWorker { handle })
    }

    /// Serializes `payload` and enqueues it under `topic`.
    ///
    /// Never fails: serialization and submission errors are logged.
    pub fn emit<P: Serialize + ?Sized>(&self, topic: impl Into<String>, payload: &P) {
        let topic = topic.into();
        match serde_json::to_value(payload) {
            Ok(value) => self.emit_value(topic, value),
            Err(err) => {
                tracing::warn!(%topic, error = %err, "Failed to serialize event payload");
            }
        }
    }

    /// Enqueues an already serialized payload.
    pub fn emit_value(&self, topic: impl Into<String>, payload: Value) {
        let event = Event::new(topic, payload);
        if let Err(err) = self.tx.send(event) {
            tracing::warn!(topic = %err.0.topic, "Event worker stopped, dropping event");
        }
    }
}

impl EventWorker {
    /// Waits until every submitted event has been handed to the sink.
    ///
    /// Returns once all [`EventEmitter`] clones are dropped and the queue is
    /// drained.
    pub async fn finish(self) {
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "Event worker terminated abnormally");
        }
    }
}

async fn deliver(mut rx: mpsc::UnboundedReceiver<Event>, sink: Arc<dyn EventSink>) {
    while let Some(event) = rx.recv().await {
        match sink.publish(&event).await {
            Ok(()) => tracing::trace!(topic = %event.topic, "Event delivered"),
            Err(err) => {
                tracing::warn!(topic = %event.topic, error = %err, "Failed to publish event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bazaar_core::events::{EventError, Result as EventResult};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingSink {
        fn topics(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.topic.clone())
                .collect()
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn publish(&self, event: &Event) -> EventResult<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// Fails every other event.
    #[derive(Default)]
    struct FlakySink {
        calls: Mutex<u32>,
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventSink for FlakySink {
        async fn publish(&self, event: &Event) -> EventResult<()> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls % 2 == 0 {
                return Err(EventError::PublishFailed("broker unavailable".into()));
            }
            self.delivered.lock().unwrap().push(event.topic.clone());
            Ok(())
        }
    }

    struct SlowSink {
        inner: RecordingSink,
    }

    #[async_trait]
    impl EventSink for SlowSink {
        async fn publish(&self, event: &Event) -> EventResult<()> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.inner.publish(event).await
        }
    }

    #[tokio::test]
    async fn test_events_are_delivered_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let (emitter, worker) = EventEmitter::spawn(sink.clone());

        emitter.emit("ride.created", &json!({"n": 1}));
        emitter.emit("ride.updated", &json!({"n": 2}));
        emitter.emit("ride.deleted", &json!({"n": 3}));
        drop(emitter);
        worker.finish().await;

        assert_eq!(sink.topics(), ["ride.created", "ride.updated", "ride.deleted"]);
    }

    #[tokio::test]
    async fn test_payload_is_snapshotted_at_submission() {
        let sink = Arc::new(RecordingSink::default());
        let (emitter, worker) = EventEmitter::spawn(sink.clone());

        let mut payload = json!({"status": "pending"});
        emitter.emit("order.created", &payload);
        payload["status"] = json!("paid");
        drop(emitter);
        worker.finish().await;

        let events = sink.events.lock().unwrap();
        assert_eq!(events[0].payload, json!({"status": "pending"}));
    }

    #[tokio::test]
    async fn test_sink_failures_do_not_stop_delivery() {
        let sink = Arc::new(FlakySink::default());
        let (emitter, worker) = EventEmitter::spawn(sink.clone());

        for topic in ["a.created", "b.created", "c.created"] {
            emitter.emit(topic, &json!({}));
        }
        drop(emitter);
        worker.finish().await;

        assert_eq!(*sink.delivered.lock().unwrap(), ["a.created", "c.created"]);
    }

    #[tokio::test]
    async fn test_emit_returns_before_delivery() {
        let sink = Arc::new(SlowSink {
            inner: RecordingSink::default(),
        });
        let (emitter, worker) = EventEmitter::spawn(sink.clone());

        emitter.emit("wallet.updated", &json!({}));
        assert!(sink.inner.topics().is_empty());

        drop(emitter);
        worker.finish().await;
        assert_eq!(sink.inner.topics(), ["wallet.updated"]);
    }

    #[tokio::test]
    async fn test_clones_share_one_worker() {
        let sink = Arc::new(RecordingSink::default());
        let (emitter, worker) = EventEmitter::spawn(sink.clone());
        let other = emitter.clone();

        emitter.emit("review.created", &json!({}));
        other.emit("review.updated", &json!({}));
        drop(emitter);
        drop(other);
        worker.finish().await;

        assert_eq!(sink.topics(), ["review.created", "review.updated"]);
    }
}
