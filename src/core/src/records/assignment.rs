use serde::{Deserialize, Serialize};

use crate::storage::{DataFile, Identified};

/// A client-product assignment. `(client_id, product_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProduct {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,
    pub assigned_at: String,
}

impl ClientProduct {
    pub const FILE: DataFile = DataFile::ClientProducts;

    pub fn pairs_with(&self, client_id: i64, product_id: i64) -> bool {
        self.client_id == client_id && self.product_id == product_id
    }
}

impl Identified for ClientProduct {
    fn id(&self) -> i64 {
        self.id
    }
}
