//! Stateful container that applies actions and notifies observers.

use std::fmt;

use tasktrack_core::{Task, TaskAction, TaskId, TaskState, reduce};
use tasktrack_store_json::{BlobStorage, StoreError, TaskPersistence};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error};

use crate::id_alloc::IdAllocator;
use crate::observer::{CommitError, CommitObserver, PersistOnCommit};

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fields for a task whose id is allocated by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Short title.
    pub name: String,
    /// Free-form details.
    pub description: String,
    /// Optional deadline.
    pub due_date: Option<OffsetDateTime>,
}

/// Failure of [`TaskStore::add_task`].
#[derive(Debug, Error)]
pub enum AddTaskError {
    /// Every id up to `u64::MAX` has been used; nothing was dispatched.
    #[error("no task ids left to allocate")]
    IdsExhausted,

    /// The task was added but an observer failed.
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// Holds the current [`TaskState`] and applies transitions to it.
///
/// [`dispatch`](Self::dispatch) is synchronous: the reducer runs, the state is
/// replaced and every observer is notified before it returns. Observers only
/// see `&TaskState` and cannot dispatch back into the store.
pub struct TaskStore {
    state: TaskState,
    observers: Vec<(Subscription, Box<dyn CommitObserver>)>,
    next_subscription: u64,
    ids: IdAllocator,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("ids", &self.ids)
            .finish()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(TaskState::default())
    }
}

impl TaskStore {
    /// Store seeded with `initial` and no observers.
    #[must_use]
    pub fn new(initial: TaskState) -> Self {
        let ids = IdAllocator::starting_after(initial.max_id());
        Self {
            state: initial,
            observers: Vec::new(),
            next_subscription: 0,
            ids,
        }
    }

    /// Hydrate from durable storage and persist after every dispatch.
    ///
    /// Storage is read exactly once, here; the adapter is then registered as
    /// the first observer. Malformed content hydrates an empty store.
    ///
    /// # Errors
    /// Returns the backend error when the stored blob cannot be read.
    pub fn open<S>(persistence: TaskPersistence<S>) -> Result<Self, StoreError>
    where
        S: BlobStorage + 'static,
    {
        let tasks = persistence.load()?;
        debug!(count = tasks.len(), key = persistence.key(), "hydrated task store");
        let mut store = Self::new(TaskState::with_tasks(tasks));
        store.subscribe(PersistOnCommit::new(persistence));
        Ok(store)
    }

    /// Current state. Replaced wholesale on every dispatch.
    #[must_use]
    pub const fn state(&self) -> &TaskState {
        &self.state
    }

    /// Apply `action` and notify every observer in registration order.
    ///
    /// The state advances even when an observer fails; all observers still
    /// run and the first failure is returned.
    ///
    /// # Errors
    /// Returns the first [`CommitError`] raised by an observer.
    pub fn dispatch(&mut self, action: TaskAction) -> Result<(), CommitError> {
        if let TaskAction::Add(task) = &action {
            self.ids.observe(task.id);
        }
        let next = reduce(&self.state, &action);
        let changed = next != self.state;
        self.state = next;
        debug!(action = action.kind(), target = ?action.target(), changed, "dispatched");

        let mut first_failure = None;
        for (subscription, observer) in &mut self.observers {
            if let Err(err) = observer.on_commit(&self.state) {
                error!(%subscription, action = action.kind(), error = %err, "commit observer failed");
                first_failure.get_or_insert(err);
            }
        }
        first_failure.map_or(Ok(()), Err)
    }

    /// Register an observer; it runs after every later dispatch.
    pub fn subscribe(&mut self, observer: impl CommitObserver + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((subscription, Box::new(observer)));
        subscription
    }

    /// Remove an observer. Returns false when the handle was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != subscription);
        self.observers.len() != before
    }

    /// Reserve a fresh task id, or `None` once the id space is used up.
    pub const fn next_id(&mut self) -> Option<TaskId> {
        self.ids.allocate()
    }

    /// Create a `NotStarted` task with a fresh id and dispatch it.
    ///
    /// # Errors
    /// Returns [`AddTaskError::IdsExhausted`] without touching the state when
    /// no unused id is left. Returns [`AddTaskError::Commit`] for an observer
    /// failure from [`dispatch`](Self::dispatch); the task has been added to
    /// the state regardless.
    pub fn add_task(&mut self, new: NewTask) -> Result<TaskId, AddTaskError> {
        let id = self.next_id().ok_or(AddTaskError::IdsExhausted)?;
        let NewTask {
            name,
            description,
            due_date,
        } = new;
        self.dispatch(TaskAction::Add(Task::new(id, name, description, due_date)))?;
        Ok(id)
    }

    /// Tasks visible under the selected filter at instant `now`.
    #[must_use]
    pub fn visible_tasks(&self, now: OffsetDateTime) -> Vec<&Task> {
        self.state.visible_tasks(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use tasktrack_core::{StatusFilter, TaskEdit, TaskStatus};

    fn new_task(name: &str) -> NewTask {
        NewTask {
            name: name.into(),
            ..NewTask::default()
        }
    }

    fn ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
        result.unwrap_or_else(|err| panic!("dispatch must succeed: {err}"))
    }

    #[test]
    fn add_task_allocates_unique_ids() {
        let mut store = TaskStore::default();
        let ids: Vec<_> = (0..20).map(|i| ok(store.add_task(new_task(&format!("t{i}"))))).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(store.state().tasks.iter().all(|t| t.status == TaskStatus::NotStarted));
    }

    #[test]
    fn allocator_skips_ids_added_by_callers() {
        let mut store = TaskStore::default();
        ok(store.dispatch(TaskAction::Add(Task::new(TaskId(50), "manual", "", None))));
        let id = ok(store.add_task(new_task("auto")));
        assert_eq!(id, TaskId(51));
    }

    #[test]
    fn allocator_continues_after_initial_state() {
        let initial = TaskState::with_tasks(vec![Task::new(TaskId(8), "a", "", None)]);
        let mut store = TaskStore::new(initial);
        assert_eq!(store.next_id(), Some(TaskId(9)));
    }

    #[test]
    fn add_task_refuses_to_reuse_the_largest_id() {
        let initial = TaskState::with_tasks(vec![Task::new(TaskId(u64::MAX), "last", "", None)]);
        let mut store = TaskStore::new(initial);
        let writes = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&writes);
        store.subscribe(move |_: &TaskState| *counter.borrow_mut() += 1);

        for _ in 0..2 {
            assert!(matches!(
                store.add_task(new_task("overflow")),
                Err(AddTaskError::IdsExhausted)
            ));
        }

        let ids: Vec<_> = store.state().tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(u64::MAX)]);
        assert_eq!(*writes.borrow(), 0);
    }

    #[test]
    fn observers_run_once_per_dispatch_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = TaskStore::default();
        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            store.subscribe(move |state: &TaskState| {
                log.borrow_mut().push((name, state.tasks.len()));
            });
        }

        ok(store.add_task(new_task("a")));
        ok(store.dispatch(TaskAction::Delete(TaskId(404))));

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 1), ("second", 1)]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = TaskStore::default();
        let counter = Rc::clone(&calls);
        let handle = store.subscribe(move |_: &TaskState| *counter.borrow_mut() += 1);

        ok(store.dispatch(TaskAction::SetFilter(StatusFilter::Completed)));
        assert!(store.unsubscribe(handle));
        assert!(!store.unsubscribe(handle));
        ok(store.dispatch(TaskAction::SetFilter(StatusFilter::All)));

        assert_eq!(*calls.borrow(), 1);
    }

    struct FailingObserver;

    impl CommitObserver for FailingObserver {
        fn on_commit(&mut self, _state: &TaskState) -> Result<(), CommitError> {
            Err(CommitError::Persist(StoreError::LockError))
        }
    }

    #[test]
    fn observer_failure_is_reported_but_state_advances() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = TaskStore::default();
        store.subscribe(FailingObserver);
        let counter = Rc::clone(&calls);
        store.subscribe(move |_: &TaskState| *counter.borrow_mut() += 1);

        let result = store.add_task(new_task("kept"));

        assert!(matches!(
            result,
            Err(AddTaskError::Commit(CommitError::Persist(StoreError::LockError)))
        ));
        assert_eq!(store.state().tasks.len(), 1);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unknown_id_leaves_tasks_unchanged() {
        let mut store = TaskStore::default();
        let id = ok(store.add_task(new_task("a")));
        let before = store.state().clone();
        let missing = TaskId(id.get() + 100);
        for action in [
            TaskAction::ToggleStart(missing),
            TaskAction::Complete(missing),
            TaskAction::Edit(TaskEdit::new(missing, None)),
            TaskAction::Delete(missing),
        ] {
            ok(store.dispatch(action));
            assert_eq!(store.state(), &before);
        }
    }

    #[test]
    fn visible_tasks_follow_selected_filter() {
        let mut store = TaskStore::default();
        let a = ok(store.add_task(new_task("a")));
        ok(store.add_task(new_task("b")));
        ok(store.dispatch(TaskAction::Complete(a)));
        ok(store.dispatch(TaskAction::SetFilter(StatusFilter::Completed)));

        let now = OffsetDateTime::now_utc();
        let visible: Vec<_> = store.visible_tasks(now).iter().map(|t| t.id).collect();
        assert_eq!(visible, vec![a]);
    }
}
