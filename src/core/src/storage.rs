//! Storage subsystem
//!
//! This module provides the record store: whole-file JSON documents on a
//! pluggable backend, per-file locking, and id allocation.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining the raw document API.
//! - `types`: the `DataFile` catalogue of persisted files.
//! - `file_storage`: filesystem-backed implementation, the canonical layout.
//! - `memory_storage`: in-process implementation for tests.
//! - `record_store`: typed load/save, snapshots and file locks over a backend.
//! - `id_allocator`: `max + 1` identity allocation.

pub mod file_storage;
pub mod id_allocator;
pub mod memory_storage;
pub mod record_store;
pub mod storage_trait;
pub mod types;

pub use file_storage::FileStorage;
pub use id_allocator::{next_id, next_id_by, Identified};
pub use memory_storage::MemoryStorage;
pub use record_store::{FileLocks, RecordStore};
pub use storage_trait::Storage;
pub use types::DataFile;
