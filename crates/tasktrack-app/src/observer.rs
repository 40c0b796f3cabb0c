//! Hooks that run after every dispatch.

use tasktrack_core::TaskState;
use tasktrack_store_json::{BlobStorage, StoreError, TaskPersistence};
use thiserror::Error;

/// Failure reported by a commit observer.
///
/// The transition that triggered the observer has already been applied.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Writing the task list to durable storage failed.
    #[error("failed to persist tasks: {0}")]
    Persist(#[from] StoreError),
}

/// Receives the new state after each dispatch.
pub trait CommitObserver {
    /// Called once per dispatch, after the reducer ran.
    ///
    /// # Errors
    /// Returns an error when the observer's side effect fails.
    fn on_commit(&mut self, state: &TaskState) -> Result<(), CommitError>;
}

impl<F> CommitObserver for F
where
    F: FnMut(&TaskState),
{
    fn on_commit(&mut self, state: &TaskState) -> Result<(), CommitError> {
        self(state);
        Ok(())
    }
}

/// Observer that overwrites durable storage with the full task list.
#[derive(Debug)]
pub struct PersistOnCommit<S> {
    persistence: TaskPersistence<S>,
}

impl<S> PersistOnCommit<S> {
    /// Wrap a persistence adapter.
    pub const fn new(persistence: TaskPersistence<S>) -> Self {
        Self { persistence }
    }
}

impl<S: BlobStorage> CommitObserver for PersistOnCommit<S> {
    fn on_commit(&mut self, state: &TaskState) -> Result<(), CommitError> {
        self.persistence.save(&state.tasks)?;
        Ok(())
    }
}
