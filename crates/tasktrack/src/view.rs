use std::io::{self, Write};

use tasktrack_core::Task;
use tasktrack_core::due::format_due_date;
use time::UtcOffset;

/// Print tasks as a pipe-separated table.
pub fn render_task_table<W: Write>(out: &mut W, tasks: &[&Task], offset: UtcOffset) -> io::Result<()> {
    writeln!(out, "ID | Status | Name | Due | Description")?;
    writeln!(out, "-- | ------ | ---- | --- | -----------")?;
    for task in tasks {
        let description = if task.description.is_empty() {
            "-"
        } else {
            task.description.as_str()
        };
        writeln!(
            out,
            "{} | {} | {} | {} | {}",
            task.id,
            task.status,
            task.name,
            format_due_date(task.due_date, offset),
            description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_core::{TaskId, TaskStatus};
    use time::macros::datetime;

    #[test]
    fn renders_one_row_per_task() {
        let mut started = Task::new(TaskId(2), "Write", "", Some(datetime!(2025-02-03 09:00 UTC)));
        started.status = TaskStatus::Started;
        let plain = Task::new(TaskId(1), "Read", "chapter 2", None);

        let mut out = Vec::new();
        render_task_table(&mut out, &[&plain, &started], UtcOffset::UTC)
            .unwrap_or_else(|err| panic!("render must succeed: {err}"));
        let text = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));

        let rows: Vec<_> = text.lines().skip(2).collect();
        assert_eq!(
            rows,
            vec![
                "1 | Not Started | Read | No due date | chapter 2",
                "2 | Started | Write | 03/02/25 | -",
            ]
        );
    }
}
