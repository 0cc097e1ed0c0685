use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::error_handling::types::CatalogError;
use crate::records::{timestamp, ClientProduct};
use crate::storage::{next_id, RecordStore};

/// Client-product assignments, kept in `data/client_product.json`.
#[derive(Clone)]
pub struct AssignmentManager {
    store: Arc<RecordStore>,
}

impl AssignmentManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<ClientProduct>, CatalogError> {
        Ok(self.store.load(ClientProduct::FILE)?)
    }

    /// Assigns `product_id` to `client_id`; Conflict if the pair exists.
    ///
    /// The id is the current epoch second, bumped past the highest existing
    /// id when several assignments land in the same second.
    pub fn assign(&self, client_id: i64, product_id: i64) -> Result<ClientProduct, CatalogError> {
        let _locks = self.store.lock(&[ClientProduct::FILE])?;
        let mut assignments: Vec<ClientProduct> = self.store.load(ClientProduct::FILE)?;

        if assignments.iter().any(|a| a.pairs_with(client_id, product_id)) {
            warn!("Product {} already assigned to client {}", product_id, client_id);
            return Err(CatalogError::Conflict("Already assigned".into()));
        }

        let assignment = ClientProduct {
            id: Utc::now().timestamp().max(next_id(&assignments)),
            client_id,
            product_id,
            assigned_at: timestamp::now(),
        };
        assignments.push(assignment.clone());
        self.store.save(ClientProduct::FILE, &assignments)?;
        info!(
            "Assigned product {} to client {} as {}",
            product_id, client_id, assignment.id
        );
        Ok(assignment)
    }

    pub fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let _locks = self.store.lock(&[ClientProduct::FILE])?;
        let mut assignments: Vec<ClientProduct> = self.store.load(ClientProduct::FILE)?;
        let before = assignments.len();
        assignments.retain(|a| a.id != id);
        if assignments.len() == before {
            warn!("Assignment {} not found", id);
            return Err(CatalogError::NotFound("Not found".into()));
        }
        self.store.save(ClientProduct::FILE, &assignments)?;
        info!("Deleted assignment {}", id);
        Ok(())
    }
}
