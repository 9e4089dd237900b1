//! Shared persistent key-value store.
//!
//! The session manager is the only writer of [`TOKEN_KEY`]; the HTTP client
//! reads it on every request. Both receive the same `Arc<dyn KeyValueStore>`
//! at construction instead of looking up a process-global.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::StoreError;

/// Key under which the current bearer token is persisted.
pub const TOKEN_KEY: &str = "firebaseToken";

/// String key-value persistence with atomic snapshot reads.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`. Absent keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing entry cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Used by tests and by embedders that do not want anything
/// written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
