use crate::action::TaskAction;
use crate::id::TaskId;
use crate::{Task, TaskState, TaskStatus};

/// Compute the state that follows `action`.
///
/// The input is never modified. Actions naming an unknown id return a copy of
/// the current state; no action fails.
#[must_use]
pub fn reduce(state: &TaskState, action: &TaskAction) -> TaskState {
    match action {
        TaskAction::Add(task) => {
            let mut tasks = Vec::with_capacity(state.tasks.len() + 1);
            tasks.extend_from_slice(&state.tasks);
            tasks.push(task.clone());
            TaskState {
                tasks,
                selected_filter: state.selected_filter,
            }
        }
        TaskAction::ToggleStart(id) => map_task(state, *id, |task| Task {
            status: task.status.toggled(),
            ..task.clone()
        }),
        TaskAction::Complete(id) => map_task(state, *id, |task| Task {
            status: TaskStatus::Completed,
            ..task.clone()
        }),
        TaskAction::Edit(edit) => map_task(state, edit.id, |task| edit.apply_to(task)),
        TaskAction::Delete(id) => {
            if !state.contains(*id) {
                return state.clone();
            }
            TaskState {
                tasks: state
                    .tasks
                    .iter()
                    .filter(|task| task.id != *id)
                    .cloned()
                    .collect(),
                selected_filter: state.selected_filter,
            }
        }
        TaskAction::SetFilter(filter) => TaskState {
            tasks: state.tasks.clone(),
            selected_filter: *filter,
        },
    }
}

// Colliding ids are all rewritten, matching how Delete removes every match.
fn map_task(state: &TaskState, id: TaskId, update: impl Fn(&Task) -> Task) -> TaskState {
    TaskState {
        tasks: state
            .tasks
            .iter()
            .map(|task| if task.id == id { update(task) } else { task.clone() })
            .collect(),
        selected_filter: state.selected_filter,
    }
}
