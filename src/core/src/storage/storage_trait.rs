//! Storage Trait
//!
//! This module defines the `Storage` trait, the raw document interface the
//! record store is built on.
//!
//! A backend only moves whole documents: it knows nothing about records,
//! ids or locking. Each `DataFile` maps to exactly one document.

use crate::error_handling::types::StorageError;
use crate::storage::types::DataFile;

/// The `Storage` trait defines the interface for document storage backends.
///
/// All methods return a `Result` to handle potential storage errors.
pub trait Storage: Send + Sync {
    /// Reads the full text of a document, `None` if it does not exist.
    fn read(&self, file: DataFile) -> Result<Option<String>, StorageError>;

    /// Replaces the full text of a document, creating it if needed.
    fn write(&self, file: DataFile, contents: &str) -> Result<(), StorageError>;

    /// Removes a document. Removing an absent document is not an error.
    fn remove(&self, file: DataFile) -> Result<(), StorageError>;
}
