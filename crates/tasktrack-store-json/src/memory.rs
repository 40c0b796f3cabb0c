use std::collections::HashMap;
use std::sync::Mutex;

use crate::{BlobStorage, StoreError};

/// Process-local key-value storage, mainly for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with one pre-populated entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        storage
    }
}

impl BlobStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockError)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockError)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_was_set() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("tasks").ok().flatten(), None);
        storage
            .set("tasks", "[]")
            .unwrap_or_else(|err| panic!("set must succeed: {err}"));
        assert_eq!(storage.get("tasks").ok().flatten().as_deref(), Some("[]"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let storage = MemoryStorage::with_entry("tasks", "old");
        storage
            .set("tasks", "new")
            .unwrap_or_else(|err| panic!("set must succeed: {err}"));
        assert_eq!(storage.get("tasks").ok().flatten().as_deref(), Some("new"));
    }
}
