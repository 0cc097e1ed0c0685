//! Catalog management: one manager per administered resource.
//!
//! Managers hold the shared [`RecordStore`] and implement each operation as
//! a locked load, mutate and save cycle. They carry no HTTP concerns; the
//! web interface maps their results and [`CatalogError`]s onto responses.

use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error_handling::types::CatalogError;
use crate::records::{revise, timestamp, Record};
use crate::storage::RecordStore;

pub mod assignment_manager;
pub mod client_manager;
pub mod license_manager;
pub mod product_manager;
pub mod release_manager;
pub mod settings_manager;
pub mod updates_feed;

pub use assignment_manager::AssignmentManager;
pub use client_manager::ClientManager;
pub use license_manager::LicenseManager;
pub use product_manager::ProductManager;
pub use release_manager::ReleaseManager;
pub use settings_manager::SettingsManager;
pub use updates_feed::{UpdateEntry, UpdatesFeed};

/// Every manager over one shared store.
#[derive(Clone)]
pub struct Catalog {
    pub products: ProductManager,
    pub releases: ReleaseManager,
    pub clients: ClientManager,
    pub licenses: LicenseManager,
    pub settings: SettingsManager,
    pub assignments: AssignmentManager,
    pub updates: UpdatesFeed,
}

impl Catalog {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            products: ProductManager::new(store.clone()),
            releases: ReleaseManager::new(store.clone()),
            clients: ClientManager::new(store.clone()),
            licenses: LicenseManager::new(store.clone()),
            settings: SettingsManager::new(store.clone()),
            assignments: AssignmentManager::new(store.clone()),
            updates: UpdatesFeed::new(store),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: String,
}

pub fn server_time() -> ServerTime {
    ServerTime {
        server_time: timestamp::now(),
    }
}

/// Reads a request body as a record.
pub(crate) fn from_body<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, CatalogError> {
    Ok(serde_json::from_value(Value::Object(body))?)
}

pub(crate) fn find_record<T: Record>(
    store: &RecordStore,
    id: i64,
    missing: &str,
) -> Result<T, CatalogError> {
    let records: Vec<T> = store.load(T::FILE)?;
    records.into_iter().find(|r| r.id() == id).ok_or_else(|| {
        warn!("{} has no record {}", T::FILE, id);
        CatalogError::NotFound(missing.to_string())
    })
}

/// Applies `body` to record `id` under the record's update policy.
pub(crate) fn update_record<T: Record>(
    store: &RecordStore,
    id: i64,
    body: Map<String, Value>,
    missing: &str,
) -> Result<T, CatalogError> {
    let _locks = store.lock(&[T::FILE])?;
    let mut records: Vec<T> = store.load(T::FILE)?;
    let slot = records.iter_mut().find(|r| r.id() == id).ok_or_else(|| {
        warn!("{} has no record {} to update", T::FILE, id);
        CatalogError::NotFound(missing.to_string())
    })?;
    *slot = revise(slot, body, &timestamp::now())?;
    let updated = slot.clone();
    store.save(T::FILE, &records)?;
    Ok(updated)
}

/// Removes record `id`, NotFound if nothing matched.
pub(crate) fn delete_record<T: Record>(
    store: &RecordStore,
    id: i64,
    missing: &str,
) -> Result<(), CatalogError> {
    let _locks = store.lock(&[T::FILE])?;
    let mut records: Vec<T> = store.load(T::FILE)?;
    let before = records.len();
    records.retain(|r| r.id() != id);
    if records.len() == before {
        warn!("{} has no record {} to delete", T::FILE, id);
        return Err(CatalogError::NotFound(missing.to_string()));
    }
    store.save(T::FILE, &records)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{Map, Value};

    pub fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected an object, got {}", other),
        }
    }
}
