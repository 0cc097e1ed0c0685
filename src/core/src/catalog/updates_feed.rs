use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::error_handling::types::CatalogError;
use crate::records::{timestamp, Artifact, Product, Release, ReleaseDependency, UpdateLog};
use crate::storage::{DataFile, RecordStore};

const UNKNOWN_PRODUCT: &str = "Unknown Product";
const UNTITLED: &str = "(No Title Provided)";

/// One release as shown in the updates feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub release_id: i64,
    pub product_id: i64,
    /// The product's `name` as stored, whatever its type.
    pub product_name: Value,
    pub version: String,
    pub release_type: String,
    pub status: String,
    pub release_date: String,
    pub title: String,
    pub notes: String,
    pub changelog: Vec<Value>,
    pub artifacts: Vec<Artifact>,
    pub dependencies: Vec<ReleaseDependency>,
    pub update_logs: Vec<UpdateLog>,
    pub last_modified: String,
}

/// Read-only view joining releases with their product names.
#[derive(Clone)]
pub struct UpdatesFeed {
    store: Arc<RecordStore>,
}

impl UpdatesFeed {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<UpdateEntry>, CatalogError> {
        let products: Vec<Product> = self.store.load(DataFile::Products)?;
        let releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let entries = project(releases, &products);
        debug!("Updates feed has {} entries", entries.len());
        Ok(entries)
    }
}

/// Builds feed entries, newest release date first.
pub fn project(releases: Vec<Release>, products: &[Product]) -> Vec<UpdateEntry> {
    let mut entries: Vec<UpdateEntry> = releases
        .into_iter()
        .map(|release| {
            let product_name = products
                .iter()
                .find(|p| p.product_id == release.product_id)
                .map(|p| p.name().cloned().unwrap_or(Value::Null))
                .unwrap_or_else(|| Value::from(UNKNOWN_PRODUCT));
            let changelog = match release.changelog {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            UpdateEntry {
                release_id: release.release_id,
                product_id: release.product_id,
                product_name,
                version: release.version,
                release_type: release.release_type,
                status: release.status,
                release_date: release.release_date,
                title: release.title.unwrap_or_else(|| UNTITLED.to_string()),
                notes: release.notes.unwrap_or_default(),
                changelog,
                artifacts: release.artifacts,
                dependencies: release.dependencies,
                update_logs: release.update_logs,
                last_modified: release.last_modified.unwrap_or_default(),
            }
        })
        .collect();

    // stable: equal dates keep their stored order
    entries.sort_by(|a, b| newest_first(&a.release_date, &b.release_date));
    entries
}

fn newest_first(a: &str, b: &str) -> Ordering {
    match (timestamp::parse_loose(a), timestamp::parse_loose(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn release(id: i64, product_id: i64, date: &str) -> Release {
        serde_json::from_value(json!({
            "releaseId": id, "productId": product_id, "version": "1.0.0",
            "releaseDate": date
        }))
        .unwrap()
    }

    fn product(id: i64, name: &str) -> Product {
        serde_json::from_value(json!({"productId": id, "name": name})).unwrap()
    }

    #[test]
    fn test_unknown_product_and_defaults() {
        let entries = project(vec![release(1, 7, "2024-03-01")], &[]);
        let entry = &entries[0];
        assert_eq!(entry.product_name, "Unknown Product");
        assert_eq!(entry.notes, "");
        assert!(entry.changelog.is_empty());
        assert_eq!(entry.title, "(No Title Provided)");
        assert_eq!(entry.last_modified, "");
        assert_eq!(entry.release_type, "minor");
        assert_eq!(entry.status, "draft");
    }

    #[test]
    fn test_first_product_match_wins() {
        let products = vec![product(1, "Widget"), product(1, "Shadow")];
        let entries = project(vec![release(1, 1, "2024-03-01")], &products);
        assert_eq!(entries[0].product_name, "Widget");
    }

    #[test]
    fn test_changelog_kept_when_list() {
        let mut with_list = release(1, 1, "2024-03-01");
        with_list.changelog = Some(json!(["fix a", "fix b"]));
        let mut with_text = release(2, 1, "2024-03-01");
        with_text.changelog = Some(json!("fixed things"));

        let entries = project(vec![with_list, with_text], &[]);
        assert_eq!(entries[0].changelog, vec![json!("fix a"), json!("fix b")]);
        assert!(entries[1].changelog.is_empty());
    }

    #[test]
    fn test_sorted_by_instant_newest_first() {
        let releases = vec![
            release(1, 1, "2024-02-29T23:00:00Z"),
            release(2, 1, "not a date"),
            release(3, 1, "2024-03-01"),
            release(4, 1, "2023-12-31T10:00:00"),
        ];
        let ids: Vec<i64> = project(releases, &[]).iter().map(|e| e.release_id).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_equal_dates_keep_stored_order() {
        let releases = vec![
            release(1, 1, "2024-03-01"),
            release(2, 1, "2024-03-01T00:00:00Z"),
            release(3, 1, "2024-03-01"),
        ];
        let ids: Vec<i64> = project(releases, &[]).iter().map(|e| e.release_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_entry_wire_shape() {
        let entries = project(vec![release(1, 1, "2024-03-01")], &[product(1, "Widget")]);
        let wire = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(wire["productName"], json!("Widget"));
        assert_eq!(wire["updateLogs"], json!([]));
        assert_eq!(wire["releaseDate"], json!("2024-03-01"));
    }
}
