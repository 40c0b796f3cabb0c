//! Error types for tasktrack storage operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the task blob.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The stored blob exists but is not a JSON array of tasks.
    #[error("Malformed task data under key '{key}': {source}")]
    Malformed {
        /// Storage key that was read.
        key: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize tasks to JSON.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The storage key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Failed to acquire the storage lock.
    #[error("Storage lock error")]
    LockError,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
