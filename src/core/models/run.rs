use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub pipeline_run_id: String,
    pub message_count: usize,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}
