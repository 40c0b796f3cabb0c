//! Domain types, the task reducer and the filter engine for tasktrack.
//!
//! Everything in this crate is pure: [`reduce`] maps a [`TaskState`] and a
//! [`TaskAction`] to the next state, and [`filter::apply`] derives the visible
//! subset of tasks. Storage and subscription wiring live in other crates.

/// Transition payloads.
pub mod action;
/// Due date parsing and display.
pub mod due;
pub mod filter;
/// Identifier types.
pub mod id;
mod reducer;
mod status;

pub use action::{Field, TaskAction, TaskEdit};
pub use filter::{FilterParseError, StatusFilter};
pub use id::TaskId;
pub use reducer::reduce;
pub use status::TaskStatus;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique within the collection.
    pub id: TaskId,
    /// Short title.
    pub name: String,
    /// Deadline; `None` means no deadline.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Free-form details, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
}

impl Task {
    /// Build a task in the `NotStarted` state.
    #[must_use]
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            due_date,
            description: description.into(),
            status: TaskStatus::NotStarted,
        }
    }
}

/// Aggregate state: the task list plus the selected view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    /// Tasks in insertion order.
    pub tasks: Vec<Task>,
    /// View requested by the user; never affects stored tasks.
    pub selected_filter: StatusFilter,
}

impl TaskState {
    /// State seeded with previously stored tasks and the default filter.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            selected_filter: StatusFilter::default(),
        }
    }

    /// Look up a task by id (first match).
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Returns true when a task with `id` exists.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    /// Highest id currently in use.
    #[must_use]
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.iter().map(|task| task.id).max()
    }

    /// Tasks visible under the selected filter at instant `now`.
    #[must_use]
    pub fn visible_tasks(&self, now: OffsetDateTime) -> Vec<&Task> {
        filter::apply(&self.tasks, self.selected_filter, now)
    }
}
