use std::sync::Arc;

use log::{info, warn};
use serde_json::{Map, Value};

use crate::catalog::from_body;
use crate::error_handling::types::{CatalogError, StorageError};
use crate::records::{is_falsy, timestamp, Notification, Settings};
use crate::storage::{next_id, DataFile, RecordStore};

/// The settings document. It is never created here: every operation on a
/// store without a non-empty `settings.json` is NotFound.
#[derive(Clone)]
pub struct SettingsManager {
    store: Arc<RecordStore>,
}

impl SettingsManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Result<Settings, CatalogError> {
        self.load()
    }

    /// Replaces the `user` sub-record wholesale.
    pub fn update_user(&self, user: Map<String, Value>) -> Result<Map<String, Value>, CatalogError> {
        let _locks = self.store.lock(&[DataFile::Settings])?;
        let mut settings = self.load()?;
        settings.user = user.clone();
        self.store.save(DataFile::Settings, &settings)?;
        info!("Updated settings user");
        Ok(user)
    }

    /// Adds a notification at the front of the list.
    pub fn add_notification(&self, mut body: Map<String, Value>) -> Result<Notification, CatalogError> {
        let _locks = self.store.lock(&[DataFile::Settings])?;
        let mut settings = self.load()?;

        let notification_id = next_id(&settings.notifications);
        body.insert("notificationId".into(), Value::from(notification_id));
        body.insert("createdAt".into(), Value::String(timestamp::now()));
        let notification: Notification = from_body(body)?;

        settings.notifications.insert(0, notification.clone());
        self.store.save(DataFile::Settings, &settings)?;
        info!("Added notification {}", notification_id);
        Ok(notification)
    }

    /// Removes a notification. An absent id is not an error.
    pub fn delete_notification(&self, notification_id: i64) -> Result<(), CatalogError> {
        let _locks = self.store.lock(&[DataFile::Settings])?;
        let mut settings = self.load()?;
        settings
            .notifications
            .retain(|n| n.notification_id != notification_id);
        self.store.save(DataFile::Settings, &settings)?;
        info!("Deleted notification {}", notification_id);
        Ok(())
    }

    /// An absent file and an empty document both count as no settings.
    fn load(&self) -> Result<Settings, CatalogError> {
        match self.store.load_document::<Value>(DataFile::Settings)? {
            Some(document) if !is_falsy(&document) => {
                serde_json::from_value(document).map_err(|e| {
                    CatalogError::Storage(StorageError::Corrupt {
                        file: DataFile::Settings.to_string(),
                        reason: e.to_string(),
                    })
                })
            }
            _ => {
                warn!("settings.json is missing or empty");
                Err(CatalogError::NotFound("Settings not found".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::body;
    use serde_json::json;

    fn seeded() -> (SettingsManager, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::in_memory());
        store
            .save(
                DataFile::Settings,
                &json!({
                    "user": {"userId": 1, "name": "Ada"},
                    "notifications": [{"notificationId": 4, "message": "old"}],
                    "theme": "dark"
                }),
            )
            .unwrap();
        (SettingsManager::new(store.clone()), store)
    }

    #[test]
    fn test_missing_settings_is_not_found_and_not_created() {
        let store = Arc::new(RecordStore::in_memory());
        let settings = SettingsManager::new(store.clone());
        let not_found = CatalogError::NotFound("Settings not found".into());
        assert_eq!(settings.get().unwrap_err(), not_found);
        assert_eq!(settings.update_user(Map::new()).unwrap_err(), not_found);
        assert_eq!(settings.add_notification(Map::new()).unwrap_err(), not_found);
        assert_eq!(settings.delete_notification(1).unwrap_err(), not_found);
        assert_eq!(store.snapshot(DataFile::Settings).unwrap(), None);
    }

    #[test]
    fn test_empty_settings_document_is_not_found() {
        let store = Arc::new(RecordStore::in_memory());
        store.save(DataFile::Settings, &json!({})).unwrap();
        let settings = SettingsManager::new(store.clone());
        let not_found = CatalogError::NotFound("Settings not found".into());
        assert_eq!(settings.get().unwrap_err(), not_found);
        assert_eq!(settings.update_user(body(json!({"name": "Ada"}))).unwrap_err(), not_found);
        assert_eq!(settings.add_notification(Map::new()).unwrap_err(), not_found);
        assert_eq!(store.load_document::<Value>(DataFile::Settings).unwrap(), Some(json!({})));
    }

    #[test]
    fn test_update_user_replaces_wholesale() {
        let (settings, _) = seeded();
        let user = settings.update_user(body(json!({"userId": 2}))).unwrap();
        assert_eq!(user, body(json!({"userId": 2})));
        let stored = settings.get().unwrap();
        assert_eq!(stored.user, user);
        assert_eq!(stored.extra.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn test_notifications_newest_first() {
        let (settings, _) = seeded();
        let added = settings
            .add_notification(body(json!({"message": "new"})))
            .unwrap();
        assert_eq!(added.notification_id, 5);
        assert!(added.created_at.is_some());

        let ids: Vec<i64> = settings
            .get()
            .unwrap()
            .notifications
            .iter()
            .map(|n| n.notification_id)
            .collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn test_delete_notification_ignores_absent_id() {
        let (settings, _) = seeded();
        settings.delete_notification(42).unwrap();
        settings.delete_notification(4).unwrap();
        assert!(settings.get().unwrap().notifications.is_empty());
    }
}
