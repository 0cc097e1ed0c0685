use std::sync::Arc;

use log::info;
use serde_json::{Map, Value};

use crate::catalog::{delete_record, find_record, from_body, update_record};
use crate::error_handling::types::CatalogError;
use crate::records::{timestamp, Client};
use crate::storage::{next_id, DataFile, RecordStore};

const CLIENT_NOT_FOUND: &str = "Client not found";

#[derive(Clone)]
pub struct ClientManager {
    store: Arc<RecordStore>,
}

impl ClientManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Client>, CatalogError> {
        Ok(self.store.load(DataFile::Clients)?)
    }

    pub fn get(&self, client_id: i64) -> Result<Client, CatalogError> {
        find_record(&self.store, client_id, CLIENT_NOT_FOUND)
    }

    /// Creates a client; id and stamps are assigned, collections default empty.
    pub fn create(&self, mut body: Map<String, Value>) -> Result<Client, CatalogError> {
        let _locks = self.store.lock(&[DataFile::Clients])?;
        let mut clients: Vec<Client> = self.store.load(DataFile::Clients)?;
        let now = timestamp::now();

        let client_id = next_id(&clients);
        body.insert("clientId".into(), Value::from(client_id));
        body.insert("createdAt".into(), Value::String(now.clone()));
        body.insert("lastModified".into(), Value::String(now));
        let client: Client = from_body(body)?;

        clients.push(client.clone());
        self.store.save(DataFile::Clients, &clients)?;
        info!("Created client {}", client_id);
        Ok(client)
    }

    /// Replaces client `client_id` with `body`, keeping its id and creation stamp.
    pub fn update(&self, client_id: i64, body: Map<String, Value>) -> Result<Client, CatalogError> {
        let client = update_record::<Client>(&self.store, client_id, body, CLIENT_NOT_FOUND)?;
        info!("Updated client {}", client_id);
        Ok(client)
    }

    pub fn delete(&self, client_id: i64) -> Result<(), CatalogError> {
        delete_record::<Client>(&self.store, client_id, CLIENT_NOT_FOUND)?;
        info!("Deleted client {}", client_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::body;
    use serde_json::json;

    fn manager_with(clients: Value) -> ClientManager {
        let store = Arc::new(RecordStore::in_memory());
        store.save(DataFile::Clients, &clients).unwrap();
        ClientManager::new(store)
    }

    #[test]
    fn test_create_assigns_id_and_defaults() {
        let clients = manager_with(json!([]));
        let created = clients
            .create(body(json!({"name": "Acme", "email": "ops@acme.test"})))
            .unwrap();
        assert_eq!(created.client_id, 1);
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.last_modified);
        assert!(created.product_ids.is_empty());
        assert!(created.locations.is_empty());
        assert_eq!(created.extra.get("email"), Some(&json!("ops@acme.test")));
        assert_eq!(clients.get(1).unwrap(), created);
    }

    #[test]
    fn test_update_pins_id_and_created_at() {
        let clients = manager_with(json!([{
            "clientId": 3, "name": "Old", "createdAt": "2024-01-01T00:00:00Z",
            "lastModified": "2024-01-01T00:00:00Z", "productIds": [4]
        }]));
        let updated = clients
            .update(3, body(json!({"name": "Acme", "clientId": 10})))
            .unwrap();
        assert_eq!(updated.client_id, 3);
        assert_eq!(updated.extra.get("name"), Some(&json!("Acme")));
        assert_eq!(updated.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_ne!(updated.last_modified.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(updated.product_ids.is_empty());
        assert_eq!(clients.get(3).unwrap(), updated);
    }

    #[test]
    fn test_create_and_update_accept_non_string_name() {
        let clients = manager_with(json!([]));
        let created = clients.create(body(json!({"name": null}))).unwrap();
        assert_eq!(created.extra.get("name"), Some(&Value::Null));
        let updated = clients
            .update(created.client_id, body(json!({"name": 7})))
            .unwrap();
        assert_eq!(updated.extra.get("name"), Some(&json!(7)));
    }

    #[test]
    fn test_update_fills_missing_created_at() {
        let clients = manager_with(json!([{"clientId": 1, "name": "Legacy"}]));
        let updated = clients.update(1, body(json!({"name": "Legacy"}))).unwrap();
        assert_eq!(updated.created_at, updated.last_modified);
    }

    #[test]
    fn test_missing_client_is_not_found() {
        let clients = manager_with(json!([{"clientId": 1, "name": "Acme"}]));
        let not_found = CatalogError::NotFound("Client not found".into());
        assert_eq!(clients.get(2).unwrap_err(), not_found);
        assert_eq!(clients.update(2, Map::new()).unwrap_err(), not_found);
        assert_eq!(clients.delete(2).unwrap_err(), not_found);
        clients.delete(1).unwrap();
        assert!(clients.list().unwrap().is_empty());
    }
}
