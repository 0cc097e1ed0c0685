use log::info;
use std::sync::Arc;

use crate::configuration::config::Config;
use crate::error_handling::types::*;
use crate::storage::{FileStorage, RecordStore};
use crate::web_interface::WebServer;

/// Wires the file-backed store to the web server.
pub struct Controller {
    pub config: Config,
    store: Arc<RecordStore>,
    web_server: WebServer,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate()?;

        let storage = FileStorage::new(&config.data_dir)?;
        let store = Arc::new(RecordStore::new(Arc::new(storage)));
        let web_server = WebServer::new(store.clone(), config.cors_enabled);
        info!(
            "Controller ready: data in {}, CORS {}",
            config.data_dir.display(),
            if config.cors_enabled { "enabled" } else { "disabled" }
        );

        Ok(Self {
            config,
            store,
            web_server,
        })
    }

    pub fn store(&self) -> Arc<RecordStore> {
        self.store.clone()
    }

    /// Serves the API until the process is asked to stop.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        let addr = self.config.socket_addr()?;
        self.web_server.start(addr).await?;
        self.shutdown();
        Ok(())
    }

    pub fn shutdown(&self) {
        info!("Controller shut down");
    }
}
