//! Event emission and sink implementations.
//!
//! # Feature Flags
//!
//! - `redis`: Redis pub/sub sink.

mod emitter;
mod sinks;

#[cfg(feature = "redis")]
mod redis_sink;

pub use emitter::{EventEmitter, EventWorker};
pub use sinks::{BroadcastSink, TracingSink};

#[cfg(feature = "redis")]
pub use redis_sink::RedisEventSink;
