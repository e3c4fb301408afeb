//! Domain event types and the sink interface.

mod error;
mod traits;
mod types;

pub use error::{EventError, Result};
pub use traits::EventSink;
pub use types::{topic, DeletedPayload, Event, EventVerb};
