use crate::filter::StatusFilter;
use crate::id::TaskId;
use crate::status::TaskStatus;
use crate::Task;
use time::OffsetDateTime;

/// Per-field instruction for an edit: keep the current value or overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Leave the existing value untouched.
    #[default]
    Keep,
    /// Replace the existing value (an empty string is still a replacement).
    Set(T),
}

impl<T: Clone> Field<T> {
    /// Resolve the field against the value currently stored.
    #[must_use]
    pub fn resolve(&self, current: &T) -> T {
        match self {
            Self::Keep => current.clone(),
            Self::Set(value) => value.clone(),
        }
    }
}

impl<T> Field<T> {
    /// Returns true when the field keeps the existing value.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }
}

/// Edit payload for an existing task.
///
/// `name`, `description` and `status` may be kept; `due_date` is always
/// written, so `None` clears an existing deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    /// Target task.
    pub id: TaskId,
    /// New name.
    pub name: Field<String>,
    /// New description.
    pub description: Field<String>,
    /// New status.
    pub status: Field<TaskStatus>,
    /// New due date (`None` clears).
    pub due_date: Option<OffsetDateTime>,
}

impl TaskEdit {
    /// Edit that only writes the due date.
    #[must_use]
    pub const fn new(id: TaskId, due_date: Option<OffsetDateTime>) -> Self {
        Self {
            id,
            name: Field::Keep,
            description: Field::Keep,
            status: Field::Keep,
            due_date,
        }
    }

    /// Overwrite the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Field::Set(name.into());
        self
    }

    /// Overwrite the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Field::Set(description.into());
        self
    }

    /// Overwrite the status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Field::Set(status);
        self
    }

    pub(crate) fn apply_to(&self, task: &Task) -> Task {
        Task {
            id: task.id,
            name: self.name.resolve(&task.name),
            description: self.description.resolve(&task.description),
            due_date: self.due_date,
            status: self.status.resolve(&task.status),
        }
    }
}

/// Transitions accepted by [`reduce`](crate::reduce).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Append a fully formed task (id assigned by the caller).
    Add(Task),
    /// Flip between `Started` and `NotStarted` (`Completed` becomes `Started`).
    ToggleStart(TaskId),
    /// Mark the task as completed.
    Complete(TaskId),
    /// Overwrite fields of an existing task.
    Edit(TaskEdit),
    /// Remove the task.
    Delete(TaskId),
    /// Change the selected view filter.
    SetFilter(StatusFilter),
}

impl TaskAction {
    /// Task targeted by the action, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TaskId> {
        match self {
            Self::Add(task) => Some(task.id),
            Self::ToggleStart(id) | Self::Complete(id) | Self::Delete(id) => Some(*id),
            Self::Edit(edit) => Some(edit.id),
            Self::SetFilter(_) => None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::ToggleStart(_) => "toggle_start",
            Self::Complete(_) => "complete",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
            Self::SetFilter(_) => "set_filter",
        }
    }
}
