use std::collections::HashMap;
use std::sync::Mutex;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::Storage;
use crate::storage::types::DataFile;

/// In-process backend. Documents live only as long as the value.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<DataFile, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, file: DataFile) -> Result<Option<String>, StorageError> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| StorageError::LockPoisoned(file.to_string()))?;
        Ok(documents.get(&file).cloned())
    }

    fn write(&self, file: DataFile, contents: &str) -> Result<(), StorageError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| StorageError::LockPoisoned(file.to_string()))?;
        documents.insert(file, contents.to_string());
        Ok(())
    }

    fn remove(&self, file: DataFile) -> Result<(), StorageError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| StorageError::LockPoisoned(file.to_string()))?;
        documents.remove(&file);
        Ok(())
    }
}
