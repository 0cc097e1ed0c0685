use std::sync::Arc;

use log::{error, info};
use serde_json::{Map, Value};

use crate::catalog::{delete_record, update_record};
use crate::error_handling::types::CatalogError;
use crate::records::{
    is_falsy, timestamp, Artifact, ClientSummary, Product, ProductWithReleases, Release,
    UpdateLog,
};
use crate::storage::{next_id, DataFile, RecordStore};

const INITIAL_VERSION: &str = "1.0.0";
const INITIAL_RELEASE_TYPE: &str = "minor";
const INITIAL_STATUS: &str = "draft";
const INITIAL_NOTES: &str = "Auto-generated initial release";
const DEFAULT_ARTIFACT_URL: &str = "https://example.com/default.bin";
const DEFAULT_ARTIFACT_HASH: &str = "sha256:autogenerated";
const DEFAULT_ARTIFACT_SIZE: i64 = 1_500_000;
const DEFAULT_CLIENT_ID: i64 = 1;
const DEFAULT_CLIENT_NAME: &str = "Default Client";
const DEFAULT_LOG_STATUS: &str = "completed";

/// Every file product creation writes, in write order.
const CREATE_FILES: [DataFile; 4] = [
    DataFile::Releases,
    DataFile::Artifacts,
    DataFile::UpdateLogs,
    DataFile::Products,
];

#[derive(Clone)]
pub struct ProductManager {
    store: Arc<RecordStore>,
}

impl ProductManager {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.load(DataFile::Products)?)
    }

    /// Creates a product together with its initial release.
    ///
    /// The release gets one default artifact and one default update log;
    /// artifact and log are also appended to their standalone collections.
    /// All four files are written as one unit. Any failure is reported as
    /// `Internal` and leaves the files untouched.
    pub fn create(&self, body: Map<String, Value>) -> Result<ProductWithReleases, CatalogError> {
        self.create_with_defaults(body).map_err(|e| {
            error!("Product creation failed: {}", e);
            CatalogError::Internal(e.to_string())
        })
    }

    fn create_with_defaults(
        &self,
        mut body: Map<String, Value>,
    ) -> Result<ProductWithReleases, CatalogError> {
        let _locks = self.store.lock(&CREATE_FILES)?;
        let mut products: Vec<Product> = self.store.load(DataFile::Products)?;
        let mut releases: Vec<Release> = self.store.load(DataFile::Releases)?;
        let mut artifacts: Vec<Artifact> = self.store.load(DataFile::Artifacts)?;
        let mut update_logs: Vec<UpdateLog> = self.store.load(DataFile::UpdateLogs)?;
        let now = timestamp::now();

        let product_id = next_id(&products);
        body.insert("productId".into(), Value::from(product_id));
        body.insert("createdAt".into(), Value::String(now.clone()));
        body.insert("lastModified".into(), Value::String(now.clone()));
        for key in ["clientId", "clientName"] {
            if body.get(key).map_or(true, is_falsy) {
                body.insert(key.into(), Value::Null);
            }
        }
        let product: Product = serde_json::from_value(Value::Object(body))?;

        let release_id = next_id(&releases);
        let artifact = Artifact {
            artifact_id: next_id(&artifacts),
            release_id,
            file_url: DEFAULT_ARTIFACT_URL.into(),
            hash: DEFAULT_ARTIFACT_HASH.into(),
            signature: None,
            size: DEFAULT_ARTIFACT_SIZE,
            created_at: now.clone(),
        };
        let update_log = UpdateLog {
            update_log_id: next_id(&update_logs),
            client_id: DEFAULT_CLIENT_ID,
            release_id,
            client_location_id: None,
            installed_at: now.clone(),
            status: DEFAULT_LOG_STATUS.into(),
            client: ClientSummary {
                client_id: DEFAULT_CLIENT_ID,
                name: DEFAULT_CLIENT_NAME.into(),
                last_modified: None,
            },
            location: None,
        };
        let release = Release {
            release_id,
            product_id,
            version: INITIAL_VERSION.into(),
            release_type: INITIAL_RELEASE_TYPE.into(),
            status: INITIAL_STATUS.into(),
            release_date: now.clone(),
            notes: Some(INITIAL_NOTES.into()),
            title: None,
            changelog: None,
            artifacts: vec![artifact.clone()],
            update_logs: vec![update_log.clone()],
            dependencies: Vec::new(),
            last_modified: Some(now),
        };

        releases.push(release.clone());
        artifacts.push(artifact);
        update_logs.push(update_log);
        products.push(product.clone());

        self.store.save_all(&[
            (DataFile::Releases, serde_json::to_value(&releases)?),
            (DataFile::Artifacts, serde_json::to_value(&artifacts)?),
            (DataFile::UpdateLogs, serde_json::to_value(&update_logs)?),
            (DataFile::Products, serde_json::to_value(&products)?),
        ])?;
        info!("Created product {} with initial release {}", product_id, release_id);

        Ok(ProductWithReleases::new(product, vec![release]))
    }

    /// Shallow-merges `body` into product `product_id`.
    pub fn update(&self, product_id: i64, body: Map<String, Value>) -> Result<Product, CatalogError> {
        let product = update_record::<Product>(&self.store, product_id, body, "Product not found")?;
        info!("Updated product {}", product_id);
        Ok(product)
    }

    /// Deletes the product only; its releases and artifacts stay.
    pub fn delete(&self, product_id: i64) -> Result<(), CatalogError> {
        delete_record::<Product>(&self.store, product_id, "Product not found")?;
        info!("Deleted product {}", product_id);
        Ok(())
    }
}
