use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author_id: String,
    /// Id of the reviewed store, driver, or courier.
    pub subject_id: String,
    /// 1 to 5.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entity for Review {
    const COLLECTION: &'static str = "reviews";
    const TOPIC_PREFIX: &'static str = "review";
    const ENTITY_TYPE: &'static str = "Review";
}
