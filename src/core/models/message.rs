use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inter-agent message as returned by `GET /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub id: String,
    pub from_agent: String,
    pub from_role: String,
    #[serde(default)]
    pub to_agent: Option<String>,
    pub message_type: String, // open set: "request", "response", "error", ...
    pub content: Value,
    pub phase: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AgentMessage {
    /// Content as display text: strings verbatim, anything else as pretty JSON.
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageList {
    pub messages: Vec<AgentMessage>,
    pub total: usize,
}
