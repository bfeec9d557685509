//! Key/value local storage seam.
//!
//! Mirrors the browser `localStorage` contract: string keys, string values,
//! synchronous access. The file-backed implementation lives in
//! `snacksy-infrastructure`; [`MemoryLocalStorage`] is used by tests and by
//! callers that do not want anything written to disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, SnacksyError};

/// Synchronous string key/value storage.
pub trait LocalStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory [`LocalStorage`].
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| SnacksyError::storage(format!("memory storage poisoned: {}", e)))
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
