use thiserror::Error;

/// Errors that can occur when delivering an event to a sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Event emitter is closed")]
    Closed,
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_failed_display() {
        let error = EventError::PublishFailed("channel closed".to_string());
        assert_eq!(error.to_string(), "Publish failed: channel closed");
    }

    #[test]
    fn test_serialization_display() {
        let error = EventError::Serialization("key must be a string".to_string());
        assert_eq!(error.to_string(), "Serialization error: key must be a string");
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(EventError::Closed.to_string(), "Event emitter is closed");
    }
}
