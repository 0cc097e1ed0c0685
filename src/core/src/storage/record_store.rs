use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error_handling::types::StorageError;
use crate::storage::memory_storage::MemoryStorage;
use crate::storage::storage_trait::Storage;
use crate::storage::types::DataFile;

/// Load-all / save-all access to the JSON documents of a [`Storage`] backend.
///
/// Every read materialises the whole file and every save rewrites it. The
/// store adds one mutex per `DataFile`: callers hold the locks returned by
/// [`RecordStore::lock`] across their load, mutate and save steps so two
/// requests touching the same file cannot lose each other's update.
pub struct RecordStore {
    backend: Arc<dyn Storage>,
    locks: [Mutex<()>; DataFile::ALL.len()],
}

/// Guards for a set of locked files, released on drop.
pub struct FileLocks<'a> {
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn Storage>) -> Self {
        Self {
            backend,
            locks: Default::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Locks `files` in `DataFile` order, whatever order they are given in.
    pub fn lock(&self, files: &[DataFile]) -> Result<FileLocks<'_>, StorageError> {
        let mut ordered = files.to_vec();
        ordered.sort();
        ordered.dedup();
        let mut guards = Vec::with_capacity(ordered.len());
        for file in ordered {
            let guard = self.locks[file as usize].lock().map_err(|_| {
                error!("Lock for {} is poisoned", file);
                StorageError::LockPoisoned(file.to_string())
            })?;
            guards.push(guard);
        }
        Ok(FileLocks { _guards: guards })
    }

    /// Loads a collection; an absent or blank file is an empty collection.
    pub fn load<T: DeserializeOwned>(&self, file: DataFile) -> Result<Vec<T>, StorageError> {
        match self.backend.read(file)? {
            Some(text) if !text.trim().is_empty() => parse(file, &text),
            _ => {
                debug!("{} is empty or absent, using an empty collection", file);
                Ok(Vec::new())
            }
        }
    }

    /// Loads a collection that must exist on disk.
    pub fn load_required<T: DeserializeOwned>(
        &self,
        file: DataFile,
    ) -> Result<Vec<T>, StorageError> {
        match self.backend.read(file)? {
            Some(text) => parse(file, &text),
            None => {
                error!("{} is required but absent", file);
                Err(StorageError::Missing(file.to_string()))
            }
        }
    }

    /// Loads a single-record document, `None` when absent.
    pub fn load_document<T: DeserializeOwned>(
        &self,
        file: DataFile,
    ) -> Result<Option<T>, StorageError> {
        match self.backend.read(file)? {
            Some(text) => parse(file, &text).map(Some),
            None => Ok(None),
        }
    }

    /// Serialises `value` as 2-space indented JSON and overwrites `file`.
    pub fn save<T: Serialize + ?Sized>(&self, file: DataFile, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(value).map_err(|e| {
            error!("Failed to serialise {}: {}", file, e);
            StorageError::WriteFailed(file.to_string())
        })?;
        self.backend.write(file, &text)
    }

    /// Saves several files as one unit, in the given order.
    ///
    /// Every target is snapshotted first; if a write fails, the files
    /// already written are put back before the error is returned. Callers
    /// hold the locks for all of `writes`.
    pub fn save_all(&self, writes: &[(DataFile, Value)]) -> Result<(), StorageError> {
        let mut snapshots = Vec::with_capacity(writes.len());
        for (file, _) in writes {
            snapshots.push(self.snapshot(*file)?);
        }
        for (done, (file, value)) in writes.iter().enumerate() {
            if let Err(e) = self.save(*file, value) {
                error!("Write of {} failed, rolling back {} file(s)", file, done);
                for ((written, _), snapshot) in writes[..done].iter().zip(&snapshots[..done]).rev() {
                    if let Err(restore_err) = self.restore(*written, snapshot.as_deref()) {
                        error!("Rollback of {} failed: {}", written, restore_err);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Raw text of `file` as it is now, for [`RecordStore::restore`].
    pub fn snapshot(&self, file: DataFile) -> Result<Option<String>, StorageError> {
        self.backend.read(file)
    }

    /// Puts `file` back to a previous snapshot, removing it if it was absent.
    pub fn restore(&self, file: DataFile, snapshot: Option<&str>) -> Result<(), StorageError> {
        match snapshot {
            Some(text) => self.backend.write(file, text),
            None => self.backend.remove(file),
        }
    }
}

fn parse<T: DeserializeOwned>(file: DataFile, text: &str) -> Result<T, StorageError> {
    serde_json::from_str(text).map_err(|e| {
        error!("Failed to parse {}: {}", file, e);
        StorageError::Corrupt {
            file: file.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_storage::FileStorage;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_absent_collection_is_empty() {
        let store = RecordStore::in_memory();
        let rows: Vec<Value> = store.load(DataFile::Products).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let backend = Arc::new(MemoryStorage::new());
        backend.write(DataFile::Releases, "[{ not json").unwrap();
        let store = RecordStore::new(backend);
        let err = store.load::<Value>(DataFile::Releases).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref file, .. } if file == "releases.json"));
    }

    #[test]
    fn test_required_collection_must_exist() {
        let store = RecordStore::in_memory();
        assert_eq!(
            store.load_required::<Value>(DataFile::Licenses).unwrap_err(),
            StorageError::Missing("licenses.json".into())
        );
    }

    #[test]
    fn test_save_writes_two_space_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        store
            .save(DataFile::Products, &vec![json!({"productId": 1, "tags": []})])
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join("products.json")).unwrap();
        assert_eq!(text, "[\n  {\n    \"productId\": 1,\n    \"tags\": []\n  }\n]");
    }

    #[test]
    fn test_snapshot_and_restore() {
        let store = RecordStore::in_memory();
        let before = store.snapshot(DataFile::Clients).unwrap();
        store.save(DataFile::Clients, &vec![json!({"clientId": 1})]).unwrap();
        store.restore(DataFile::Clients, before.as_deref()).unwrap();
        assert_eq!(store.snapshot(DataFile::Clients).unwrap(), None);

        store.save(DataFile::Clients, &Vec::<Value>::new()).unwrap();
        let before = store.snapshot(DataFile::Clients).unwrap();
        store.save(DataFile::Clients, &vec![json!({"clientId": 2})]).unwrap();
        store.restore(DataFile::Clients, before.as_deref()).unwrap();
        assert_eq!(store.snapshot(DataFile::Clients).unwrap().as_deref(), Some("[]"));
    }

    /// Memory backend whose writes to one file always fail.
    struct FailingWrites {
        inner: MemoryStorage,
        broken: DataFile,
    }

    impl Storage for FailingWrites {
        fn read(&self, file: DataFile) -> Result<Option<String>, StorageError> {
            self.inner.read(file)
        }

        fn write(&self, file: DataFile, contents: &str) -> Result<(), StorageError> {
            if file == self.broken {
                return Err(StorageError::WriteFailed(file.to_string()));
            }
            self.inner.write(file, contents)
        }

        fn remove(&self, file: DataFile) -> Result<(), StorageError> {
            self.inner.remove(file)
        }
    }

    #[test]
    fn test_save_all_rolls_back_on_failure() {
        let inner = MemoryStorage::new();
        inner.write(DataFile::Releases, "[]").unwrap();
        let store = RecordStore::new(Arc::new(FailingWrites {
            inner,
            broken: DataFile::UpdateLogs,
        }));

        let err = store
            .save_all(&[
                (DataFile::Releases, json!([{"releaseId": 1}])),
                (DataFile::Artifacts, json!([{"artifactId": 1}])),
                (DataFile::UpdateLogs, json!([{"updateLogId": 1}])),
            ])
            .unwrap_err();

        assert_eq!(err, StorageError::WriteFailed("update_logs.json".into()));
        assert_eq!(store.snapshot(DataFile::Releases).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.snapshot(DataFile::Artifacts).unwrap(), None);
    }

    #[test]
    fn test_lock_accepts_any_order_and_duplicates() {
        let store = RecordStore::in_memory();
        {
            let _locks = store
                .lock(&[DataFile::UpdateLogs, DataFile::Products, DataFile::UpdateLogs])
                .unwrap();
        }
        // released on drop
        let _again = store.lock(&[DataFile::Products]).unwrap();
    }

    #[test]
    fn test_concurrent_locked_appends_are_not_lost() {
        let store = Arc::new(RecordStore::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let _locks = store.lock(&[DataFile::Licenses]).unwrap();
                    let mut rows: Vec<Value> = store.load(DataFile::Licenses).unwrap();
                    rows.push(json!({ "licenseId": n }));
                    store.save(DataFile::Licenses, &rows).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let rows: Vec<Value> = store.load(DataFile::Licenses).unwrap();
        assert_eq!(rows.len(), 8);
    }
}
