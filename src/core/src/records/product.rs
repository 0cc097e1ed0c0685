use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Record, Release, UpdatePolicy};
use crate::storage::{DataFile, Identified};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    /// Owning client, if any. Stored as given; `null` when unset.
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub client_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Everything else the client sent: `name`, `sku`, `description`, `updatedAt`, ...
    /// Values are stored as given, whatever their JSON type.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn name(&self) -> Option<&Value> {
        self.extra.get("name")
    }
}

impl Identified for Product {
    fn id(&self) -> i64 {
        self.product_id
    }
}

impl Record for Product {
    const FILE: DataFile = DataFile::Products;
    const POLICY: UpdatePolicy = UpdatePolicy::Merge;
    const PINNED: &'static [&'static str] = &["productId"];
}

/// Create response: the product plus the releases created with it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithReleases {
    #[serde(flatten)]
    pub product: Product,
    pub releases: Vec<Release>,
}

impl ProductWithReleases {
    /// A stored `releases` field on the product is shadowed by the created releases.
    pub fn new(mut product: Product, releases: Vec<Release>) -> Self {
        product.extra.remove("releases");
        Self { product, releases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "productId": 2,
            "name": "Widget",
            "clientId": null,
            "clientName": null,
            "category": "hardware"
        });
        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.extra.get("category"), Some(&json!("hardware")));
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[test]
    fn test_client_fields_serialise_as_null() {
        let product: Product = serde_json::from_value(json!({"productId": 1})).unwrap();
        let v = serde_json::to_value(&product).unwrap();
        assert_eq!(v["clientId"], Value::Null);
        assert_eq!(v["clientName"], Value::Null);
        assert!(v.get("sku").is_none());
        assert!(v.get("name").is_none());
    }

    #[test]
    fn test_scalar_fields_accept_any_json_type() {
        let raw = json!({"productId": 3, "name": null, "sku": 12, "description": ["a"]});
        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.name(), Some(&Value::Null));
        assert_eq!(product.extra.get("sku"), Some(&json!(12)));
        let v = serde_json::to_value(&product).unwrap();
        assert_eq!(v["sku"], json!(12));
        assert_eq!(v["description"], json!(["a"]));
    }

    #[test]
    fn test_created_releases_shadow_stored_field() {
        let product: Product =
            serde_json::from_value(json!({"productId": 1, "releases": [{"bogus": true}]})).unwrap();
        let reply = ProductWithReleases::new(product, Vec::new());
        let text = serde_json::to_string(&reply).unwrap();
        assert_eq!(text.matches("\"releases\"").count(), 1);
        assert_eq!(serde_json::to_value(&reply).unwrap()["releases"], json!([]));
    }
}
