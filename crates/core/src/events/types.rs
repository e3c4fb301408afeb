use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{RecordId, UpdateOutcome};

/// Verb of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventVerb {
    Created,
    Updated,
    Deleted,
}

impl EventVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventVerb::Created => "created",
            EventVerb::Updated => "updated",
            EventVerb::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a `<prefix>.<verb>` topic name.
pub fn topic(prefix: &str, verb: &str) -> String {
    format!("{prefix}.{verb}")
}

/// A published event.
///
/// The payload is a snapshot taken at submission time; later changes to the
/// source value are not observed by the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub topic: String,
    pub payload: Value,
    pub emitted_at: DateTime<Utc>,
}

impl Event {
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
            emitted_at: Utc::now(),
        }
    }
}

/// Payload of a `<prefix>.deleted` event: the store acknowledgment plus the
/// id of the tombstoned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPayload {
    pub id: RecordId,
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
}
