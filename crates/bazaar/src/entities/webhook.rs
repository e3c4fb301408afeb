use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

/// A subscriber endpoint for event topics. Delivery is handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub owner_id: String,
    pub url: String,
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub active: bool,
}

impl Webhook {
    pub fn subscribes_to(&self, topic: &str) -> bool {
        self.active && self.topics.iter().any(|t| t == topic)
    }
}

impl Entity for Webhook {
    const COLLECTION: &'static str = "webhooks";
    const TOPIC_PREFIX: &'static str = "webhook";
    const ENTITY_TYPE: &'static str = "Webhook";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribes_to() {
        let mut hook = Webhook {
            owner_id: "merchant-1".into(),
            url: "https://example.com/hooks".into(),
            topics: vec!["order.created".into(), "order.status_changed".into()],
            secret: None,
            active: true,
        };
        assert!(hook.subscribes_to("order.created"));
        assert!(!hook.subscribes_to("ride.created"));

        hook.active = false;
        assert!(!hook.subscribes_to("order.created"));
    }
}
