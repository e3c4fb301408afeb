use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

use super::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
    Failed,
}

/// Courier leg moving an order from a store to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<String>,
    pub pickup: Location,
    pub dropoff: Location,
    pub status: DeliveryStatus,
}

impl Entity for Delivery {
    const COLLECTION: &'static str = "deliveries";
    const TOPIC_PREFIX: &'static str = "delivery";
    const ENTITY_TYPE: &'static str = "Delivery";
}
