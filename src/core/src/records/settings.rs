use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::Identified;

/// The single settings document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub user: Map<String, Value>,
    /// Most recent first.
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub notifications: Vec<Notification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for Notification {
    fn id(&self) -> i64 {
        self.notification_id
    }
}
