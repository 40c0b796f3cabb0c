//! JSON persistence for tasktrack.
//!
//! The whole task list is serialized as one JSON array and stored under a
//! single key of a [`BlobStorage`] backend.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::rc::Rc;
use std::sync::Arc;

use tasktrack_core::Task;
use tracing::{debug, warn};

/// Key under which the task list is stored unless configured otherwise.
pub const DEFAULT_KEY: &str = "tasks";

/// Minimal key-value abstraction required by [`TaskPersistence`].
pub trait BlobStorage {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns a backend error when the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    /// Returns a backend error when the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: BlobStorage + ?Sized> BlobStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: BlobStorage + ?Sized> BlobStorage for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: BlobStorage + ?Sized> BlobStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Reads and writes the durable task list.
#[derive(Debug, Clone)]
pub struct TaskPersistence<S> {
    storage: S,
    key: String,
}

impl<S: BlobStorage> TaskPersistence<S> {
    /// Persistence using [`DEFAULT_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    /// Persistence using a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Key the blob is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored task list.
    ///
    /// Missing storage yields an empty list. Malformed content also yields an
    /// empty list; the failure is logged and otherwise dropped. Use
    /// [`try_load`](Self::try_load) to observe it.
    ///
    /// # Errors
    /// Returns a backend error when the blob cannot be read at all.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        match self.try_load() {
            Err(err @ StoreError::Malformed { .. }) => {
                warn!(key = %self.key, error = %err, "discarding unreadable task data");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Load the stored task list, surfacing malformed content as an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Malformed`] when the blob is not a JSON array of
    /// tasks, or a backend error when it cannot be read.
    pub fn try_load(&self) -> Result<Vec<Task>, StoreError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            debug!(key = %self.key, "no stored tasks");
            return Ok(Vec::new());
        };
        let tasks: Vec<Task> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                key: self.key.clone(),
                source,
            })?;
        debug!(key = %self.key, count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Serialize `tasks` and overwrite the stored blob.
    ///
    /// # Errors
    /// Returns an error when serialization or the backend write fails.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let body = serde_json::to_string(tasks).map_err(StoreError::Serialize)?;
        self.storage.set(&self.key, &body)?;
        debug!(key = %self.key, count = tasks.len(), "saved tasks");
        Ok(())
    }
}
