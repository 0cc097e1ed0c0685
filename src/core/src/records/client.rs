use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Record, UpdatePolicy};
use crate::storage::{DataFile, Identified};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub product_ids: Vec<i64>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub release_ids: Vec<i64>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub update_log_ids: Vec<i64>,
    #[serde(default, deserialize_with = "crate::records::null_as_default")]
    pub locations: Vec<ClientLocation>,
    /// `name`, `email` and any other client-supplied field, stored as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for Client {
    fn id(&self) -> i64 {
        self.client_id
    }
}

impl Record for Client {
    const FILE: DataFile = DataFile::Clients;
    const POLICY: UpdatePolicy = UpdatePolicy::Replace;
    const PINNED: &'static [&'static str] = &["clientId", "createdAt"];

    fn on_revised(&mut self, now: &str) {
        if self.created_at.is_none() {
            self.created_at = Some(now.to_string());
        }
    }
}

/// A client site. Address fields are free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLocation {
    #[serde(default)]
    pub client_location_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collections_default_when_absent_or_null() {
        let client: Client = serde_json::from_value(json!({
            "clientId": 1, "name": "Acme", "releaseIds": null
        }))
        .unwrap();
        assert!(client.product_ids.is_empty());
        assert!(client.release_ids.is_empty());
        let v = serde_json::to_value(&client).unwrap();
        assert_eq!(v["productIds"], json!([]));
        assert_eq!(v["locations"], json!([]));
    }

    #[test]
    fn test_name_may_be_any_json_value() {
        for name in [json!(null), json!(42), json!({"legal": "Acme AS"})] {
            let client: Client =
                serde_json::from_value(json!({"clientId": 1, "name": name.clone()})).unwrap();
            assert_eq!(client.extra.get("name"), Some(&name));
        }
    }

    #[test]
    fn test_location_keeps_address_fields() {
        let loc: ClientLocation = serde_json::from_value(json!({
            "clientLocationId": 1714000000000i64, "address": "1 Main St", "city": "Oslo"
        }))
        .unwrap();
        assert_eq!(loc.client_location_id, 1714000000000);
        assert_eq!(loc.extra.get("city"), Some(&json!("Oslo")));
    }
}
