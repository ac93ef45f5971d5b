//! Keyed persistence for the ledger and split collections.
//!
//! Backends move raw JSON text per key. [`Persistence`] sits on top and
//! enforces the never-fail contract the stores rely on: unreadable data comes
//! back as an empty collection and failed writes are logged and reported as
//! `false`.

pub mod json_backend;
pub mod memory;

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;

/// Key holding the transaction array.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the split group array.
pub const SPLIT_GROUPS_KEY: &str = "split_groups";
/// Key holding the split expense array.
pub const SPLIT_EXPENSES_KEY: &str = "split_expenses";

/// Abstraction over media able to hold one JSON document per key.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored text, or `None` when the key has never been written.
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, contents: &str) -> Result<()>;
    /// Short label used in logs.
    fn describe(&self) -> String;
    /// Whether data survives a restart.
    fn is_durable(&self) -> bool {
        true
    }
}

/// Opens file storage rooted at `dir`, degrading to [`MemoryStorage`] when
/// the directory cannot be prepared.
pub fn open_storage(dir: Option<PathBuf>) -> Box<dyn StorageBackend> {
    let Some(dir) = dir else {
        tracing::warn!("no data directory available; using in-memory storage");
        return Box::new(MemoryStorage::new());
    };
    match JsonFileStorage::new(dir.clone()) {
        Ok(storage) => {
            tracing::info!(path = %dir.display(), "using json file storage");
            Box::new(storage)
        }
        Err(err) => {
            tracing::warn!(
                path = %dir.display(),
                error = %err,
                "data directory unavailable; falling back to in-memory storage"
            );
            Box::new(MemoryStorage::new())
        }
    }
}

/// Typed, failure-absorbing adapter over a [`StorageBackend`].
pub struct Persistence {
    backend: Box<dyn StorageBackend>,
}

impl Persistence {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// In-process persistence, mostly for tests and storage-less hosts.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Reads the array stored under `key`.
    ///
    /// An absent key, unreadable medium, or malformed document all yield an
    /// empty vector.
    pub fn read_records<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read records; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored records are malformed; treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrites the whole array under `key`. Returns `false` when the write
    /// did not reach the backend; the caller keeps its in-memory state.
    pub fn write_records<T: Serialize>(&self, key: &str, records: &[T]) -> bool {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to encode records");
                return false;
            }
        };
        match self.backend.save(key, &json) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    key,
                    backend = %self.backend.describe(),
                    error = %err,
                    "failed to persist records; in-memory state kept"
                );
                false
            }
        }
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::in_memory()
    }
}
