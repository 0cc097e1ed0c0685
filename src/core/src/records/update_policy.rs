use serde_json::{Map, Value};

use super::Record;

/// How an update body is applied to a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Shallow merge: body fields overwrite, stored fields not in the body survive.
    Merge,
    /// The body becomes the record; only pinned fields come from the stored one.
    Replace,
}

/// Builds the updated version of `existing` from `body`.
///
/// Applies `T::POLICY`, then copies every `T::PINNED` field from `existing`
/// (dropping it from the body when `existing` has none), then stamps
/// `lastModified` with `now` and runs `T::on_revised`.
pub fn revise<T: Record>(
    existing: &T,
    body: Map<String, Value>,
    now: &str,
) -> Result<T, serde_json::Error> {
    let stored = match serde_json::to_value(existing)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    let mut fields = match T::POLICY {
        UpdatePolicy::Merge => {
            let mut merged = stored.clone();
            merged.extend(body);
            merged
        }
        UpdatePolicy::Replace => body,
    };

    for key in T::PINNED {
        match stored.get(*key) {
            Some(value) => {
                fields.insert((*key).to_string(), value.clone());
            }
            None => {
                fields.remove(*key);
            }
        }
    }
    fields.insert("lastModified".into(), Value::String(now.into()));

    let mut revised: T = serde_json::from_value(Value::Object(fields))?;
    revised.on_revised(now);
    Ok(revised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Client, Product};
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_merge_keeps_fields_missing_from_body() {
        let product: Product = serde_json::from_value(json!({
            "productId": 4, "name": "Widget", "sku": "W-1", "colour": "red"
        }))
        .unwrap();
        let revised = revise(&product, body(json!({"name": "Gadget", "productId": 99})), "T").unwrap();
        assert_eq!(revised.product_id, 4);
        assert_eq!(revised.name(), Some(&json!("Gadget")));
        assert_eq!(revised.extra.get("sku"), Some(&json!("W-1")));
        assert_eq!(revised.extra.get("colour"), Some(&json!("red")));
        assert_eq!(revised.last_modified.as_deref(), Some("T"));
    }

    #[test]
    fn test_replace_drops_fields_missing_from_body() {
        let client: Client = serde_json::from_value(json!({
            "clientId": 3, "name": "Old", "email": "a@b.c",
            "createdAt": "2024-01-01T00:00:00Z", "productIds": [1, 2]
        }))
        .unwrap();
        let revised = revise(&client, body(json!({"name": "Acme", "createdAt": "forged"})), "T").unwrap();
        assert_eq!(revised.client_id, 3);
        assert_eq!(revised.extra.get("name"), Some(&json!("Acme")));
        assert_eq!(revised.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(revised.product_ids.is_empty());
        assert!(revised.extra.get("email").is_none());
    }
}
