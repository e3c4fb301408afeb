use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

use super::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

/// A passenger trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub rider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub pickup: Location,
    pub dropoff: Location,
    pub status: RideStatus,
    /// Fare in minor currency units, set once quoted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_minor: Option<i64>,
}

impl Entity for Ride {
    const COLLECTION: &'static str = "rides";
    const TOPIC_PREFIX: &'static str = "ride";
    const ENTITY_TYPE: &'static str = "Ride";
}
