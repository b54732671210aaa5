use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderStatus {
    pub id: String,
    pub name: String,
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
