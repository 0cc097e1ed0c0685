use std::sync::Arc;

use log::info;
use serde_json::{Map, Value};

use crate::catalog::{delete_record, find_record, from_body, update_record};
use crate::error_handling::types::CatalogError;
use crate::records::{timestamp, License};
use crate::storage::{next_id, DataFile, RecordStore};

const LICENSE_NOT_FOUND: &str = "License not found";

#[derive(Clone)]
pub struct LicenseManager {
    store: Arc<RecordStore>,
}

impl LicenseManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// All licenses. Unlike other collections, a missing file is an error.
    pub fn list(&self) -> Result<Vec<License>, CatalogError> {
        Ok(self.store.load_required(DataFile::Licenses)?)
    }

    pub fn get(&self, license_id: i64) -> Result<License, CatalogError> {
        find_record(&self.store, license_id, LICENSE_NOT_FOUND)
    }

    pub fn create(&self, mut body: Map<String, Value>) -> Result<License, CatalogError> {
        let _locks = self.store.lock(&[DataFile::Licenses])?;
        let mut licenses: Vec<License> = self.store.load(DataFile::Licenses)?;

        let license_id = next_id(&licenses);
        body.insert("licenseId".into(), Value::from(license_id));
        body.insert("lastModified".into(), Value::String(timestamp::now()));
        let license: License = from_body(body)?;

        licenses.push(license.clone());
        self.store.save(DataFile::Licenses, &licenses)?;
        info!("Created license {}", license_id);
        Ok(license)
    }

    pub fn update(&self, license_id: i64, body: Map<String, Value>) -> Result<License, CatalogError> {
        let license = update_record::<License>(&self.store, license_id, body, LICENSE_NOT_FOUND)?;
        info!("Updated license {}", license_id);
        Ok(license)
    }

    pub fn delete(&self, license_id: i64) -> Result<(), CatalogError> {
        delete_record::<License>(&self.store, license_id, LICENSE_NOT_FOUND)?;
        info!("Deleted license {}", license_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::body;
    use crate::error_handling::types::StorageError;
    use serde_json::json;

    fn manager() -> LicenseManager {
        LicenseManager::new(Arc::new(RecordStore::in_memory()))
    }

    #[test]
    fn test_list_without_file_is_storage_error() {
        let licenses = manager();
        assert_eq!(
            licenses.list().unwrap_err(),
            CatalogError::Storage(StorageError::Missing("licenses.json".into()))
        );
        // single-record reads tolerate the missing file
        assert_eq!(
            licenses.get(1).unwrap_err(),
            CatalogError::NotFound("License not found".into())
        );
    }

    #[test]
    fn test_crud_cycle() {
        let licenses = manager();
        let created = licenses
            .create(body(json!({"type": "perpetual", "seats": 5})))
            .unwrap();
        assert_eq!(created.license_id, 1);
        assert_eq!(licenses.list().unwrap(), vec![created.clone()]);

        let updated = licenses
            .update(1, body(json!({"type": "subscription", "licenseId": 8})))
            .unwrap();
        assert_eq!(updated.license_id, 1);
        assert_eq!(updated.extra.get("type"), Some(&json!("subscription")));
        // full replace: fields not resent are gone
        assert!(updated.extra.get("seats").is_none());
        assert_eq!(licenses.get(1).unwrap(), updated);

        licenses.delete(1).unwrap();
        assert!(licenses.list().unwrap().is_empty());
        assert!(matches!(licenses.delete(1), Err(CatalogError::NotFound(_))));
    }
}
