//! Error types for every layer of the service.

pub mod types;

pub use types::{CatalogError, ConfigError, ControllerError, StorageError, WebError};
