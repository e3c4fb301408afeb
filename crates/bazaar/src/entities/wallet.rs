use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

/// A stored-value balance in minor units of a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub owner_id: String,
    pub balance_minor: i64,
    /// ISO 4217 code.
    pub currency: String,
}

impl Entity for Wallet {
    const COLLECTION: &'static str = "wallets";
    const TOPIC_PREFIX: &'static str = "wallet";
    const ENTITY_TYPE: &'static str = "Wallet";
}
