use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

use super::Location;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storefront {
    pub owner_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub address: Location,
    pub open: bool,
}

impl Entity for Storefront {
    const COLLECTION: &'static str = "stores";
    const TOPIC_PREFIX: &'static str = "store";
    const ENTITY_TYPE: &'static str = "Store";
}
