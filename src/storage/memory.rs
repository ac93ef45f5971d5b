use std::{collections::HashMap, sync::Mutex};

use crate::errors::{LedgerError, Result};

use super::StorageBackend;

/// Process-local storage. Behaves like the file backend for a session but
/// forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("memory storage lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("memory storage lock poisoned".into()))?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }

    fn is_durable(&self) -> bool {
        false
    }
}
