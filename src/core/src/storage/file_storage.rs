use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::Storage;
use crate::storage::types::DataFile;

/// Filesystem backend: one JSON document per `DataFile` under `base_path`.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| {
            error!("Failed to create data dir {}: {}", base_path.display(), e);
            StorageError::WriteFailed(base_path.display().to_string())
        })?;
        info!("FileStorage initialized at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, file: DataFile) -> PathBuf {
        self.base_path.join(file.relative_path())
    }

    fn staging_path_for(&self, file: DataFile) -> PathBuf {
        let mut path = self.path_for(file).into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }
}

impl Storage for FileStorage {
    fn read(&self, file: DataFile) -> Result<Option<String>, StorageError> {
        let path = self.path_for(file);
        let mut content = String::new();
        match File::open(&path) {
            Ok(mut f) => {
                f.read_to_string(&mut content).map_err(|e| {
                    error!("Read failed {}: {}", path.display(), e);
                    StorageError::ReadFailed(file.to_string())
                })?;
                debug!("Read {} byte(s) from {}", content.len(), path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", path.display());
                Ok(None)
            }
            Err(e) => {
                error!("Open failed {}: {}", path.display(), e);
                Err(StorageError::ReadFailed(file.to_string()))
            }
        }
    }

    // Staged write + rename: a crash leaves the old or the new document.
    fn write(&self, file: DataFile, contents: &str) -> Result<(), StorageError> {
        let path = self.path_for(file);
        let staging = self.staging_path_for(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create dir {}: {}", parent.display(), e);
                StorageError::WriteFailed(file.to_string())
            })?;
        }
        let mut f = File::create(&staging).map_err(|e| {
            error!("Create failed {}: {}", staging.display(), e);
            StorageError::WriteFailed(file.to_string())
        })?;
        f.write_all(contents.as_bytes())
            .and_then(|_| f.sync_all())
            .map_err(|e| {
                error!("Write failed {}: {}", staging.display(), e);
                StorageError::WriteFailed(file.to_string())
            })?;
        fs::rename(&staging, &path).map_err(|e| {
            error!("Rename {} -> {} failed: {}", staging.display(), path.display(), e);
            StorageError::WriteFailed(file.to_string())
        })?;
        debug!("Wrote {} byte(s) to {}", contents.len(), path.display());
        Ok(())
    }

    fn remove(&self, file: DataFile) -> Result<(), StorageError> {
        let path = self.path_for(file);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Remove failed {}: {}", path.display(), e);
                Err(StorageError::WriteFailed(file.to_string()))
            }
        }
    }
}
