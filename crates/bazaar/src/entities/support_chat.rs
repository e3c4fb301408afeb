use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::record::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub author_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportChat {
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub open: bool,
}

impl Entity for SupportChat {
    const COLLECTION: &'static str = "support_chats";
    const TOPIC_PREFIX: &'static str = "support_chat";
    const ENTITY_TYPE: &'static str = "SupportChat";
}
