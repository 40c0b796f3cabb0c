use std::io::Write;

use anyhow::{Context, Result};
use tasktrack_app::{AppConfig, NewTask, TaskStore};
use tasktrack_core::due::parse_due_date;
use tasktrack_core::{Field, TaskAction, TaskEdit, TaskId, TaskStatus};
use time::OffsetDateTime;
use tracing::debug;

use crate::view::render_task_table;
use crate::{Command, LsFormat};

/// Execute `command` against `store`. `now` carries the user's local offset.
pub fn run<W: Write>(
    command: Command,
    store: &mut TaskStore,
    config: &AppConfig,
    now: OffsetDateTime,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add {
            name,
            description,
            due,
            no_due,
        } => {
            let due_date = if no_due {
                None
            } else {
                Some(resolve_due(due.as_deref(), now)?.unwrap_or(now))
            };
            let id = store.add_task(NewTask {
                name,
                description,
                due_date,
            })?;
            writeln!(out, "created task: {id}")?;
        }
        Command::Start { id } => {
            warn_if_missing(store, id, out)?;
            store.dispatch(TaskAction::ToggleStart(id))?;
            if let Some(task) = store.state().get(id) {
                let verb = if task.status == TaskStatus::Started {
                    "started"
                } else {
                    "paused"
                };
                writeln!(out, "{verb} task: {id}")?;
            }
        }
        Command::Complete { id } => {
            let known = warn_if_missing(store, id, out)?;
            store.dispatch(TaskAction::Complete(id))?;
            if known {
                writeln!(out, "completed task: {id}")?;
            }
        }
        Command::Edit {
            id,
            name,
            description,
            status,
            due,
            no_due,
        } => {
            let due_date = if no_due {
                None
            } else {
                resolve_due(due.as_deref(), now)?
            };
            let known = warn_if_missing(store, id, out)?;
            store.dispatch(TaskAction::Edit(TaskEdit {
                id,
                name: Field::from(name),
                description: Field::from(description),
                status: Field::from(status),
                due_date,
            }))?;
            if known {
                writeln!(out, "updated task: {id}")?;
            }
        }
        Command::Delete { id } => {
            let known = warn_if_missing(store, id, out)?;
            store.dispatch(TaskAction::Delete(id))?;
            if known {
                writeln!(out, "deleted task: {id}")?;
            }
        }
        Command::Ls { filter, format } => {
            // Read-only: nothing is dispatched, so storage is never rewritten.
            let filter = filter.unwrap_or(config.display.default_filter);
            let visible = tasktrack_core::filter::apply(&store.state().tasks, filter, now);

            match format {
                LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&visible)?)?,
                LsFormat::Table if visible.is_empty() => {
                    if store.state().tasks.is_empty() {
                        writeln!(out, "No tasks found")?;
                    } else {
                        writeln!(out, "No tasks matched the {} filter", filter.label())?;
                    }
                }
                LsFormat::Table => render_task_table(out, &visible, now.offset())?,
            }
        }
    }

    Ok(())
}

fn resolve_due(raw: Option<&str>, now: OffsetDateTime) -> Result<Option<OffsetDateTime>> {
    raw.map(|value| parse_due_date(value, now.offset()))
        .transpose()
        .context("Invalid --due value")
}

// Unknown ids are still dispatched; the transition is a no-op.
fn warn_if_missing<W: Write>(store: &TaskStore, id: TaskId, out: &mut W) -> Result<bool> {
    if store.state().contains(id) {
        return Ok(true);
    }
    debug!(%id, "command targets unknown task");
    writeln!(out, "no task with id {id}")?;
    Ok(false)
}
