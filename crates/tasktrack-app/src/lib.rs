//! Application layer for tasktrack.
//!
//! This crate owns the stateful [`TaskStore`], the commit observers that run
//! after every dispatch, id allocation and configuration loading shared by
//! front ends.

pub mod config;
pub mod id_alloc;
pub mod observer;
pub mod store;

// Re-exports for convenience
pub use config::{AppConfig, DisplayConfig, StorageConfig};
pub use id_alloc::IdAllocator;
pub use observer::{CommitError, CommitObserver, PersistOnCommit};
pub use store::{AddTaskError, NewTask, Subscription, TaskStore};
