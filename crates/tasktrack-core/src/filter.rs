//! Derived task views keyed by the selected filter.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::time;
use time::{OffsetDateTime, UtcOffset};

use crate::{Task, TaskStatus};

/// Which subset of tasks the user asked to see.
///
/// `Overdue` is the catch-all view; compact layouts label the same value "List".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Started tasks whose deadline has not passed.
    InProgress,
    /// Completed tasks.
    Completed,
    /// Tasks without a deadline or past it, regardless of status.
    #[serde(alias = "list")]
    Overdue,
}

/// Error returned when a filter token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter: {token} (expected all, in-progress, completed or overdue)")]
pub struct FilterParseError {
    /// The rejected input.
    pub token: String,
}

impl StatusFilter {
    /// Every selectable filter, in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::InProgress, Self::Completed, Self::Overdue];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }

    /// Token accepted by [`FromStr`] and used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    /// Returns true when `task` belongs to this view at instant `now`.
    #[must_use]
    pub fn matches(self, task: &Task, now: OffsetDateTime) -> bool {
        let deadline = task.due_date.map(|due| end_of_day(due, now.offset()));
        match self {
            Self::All => true,
            Self::InProgress => {
                task.status == TaskStatus::Started && deadline.is_none_or(|end| end >= now)
            }
            Self::Completed => task.status == TaskStatus::Completed,
            // Status is deliberately not consulted: a completed task past its
            // deadline still shows up here.
            Self::Overdue => deadline.is_none_or(|end| end <= now),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            "overdue" | "list" => Ok(Self::Overdue),
            _ => Err(FilterParseError {
                token: s.to_owned(),
            }),
        }
    }
}

/// Last representable instant (23:59:59.999) of the calendar day containing
/// `due`, with the day taken in `offset`.
#[must_use]
pub fn end_of_day(due: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    due.checked_to_offset(offset)
        .unwrap_or(due)
        .replace_time(time!(23:59:59.999))
}

/// Tasks visible under `filter` at instant `now`, in stored order.
///
/// `now` should carry the user's local offset; calendar days are evaluated in it.
/// That offset is fixed: a due date on the other side of a daylight-saving
/// change is still cut at midnight in `now`'s offset, which can differ by an
/// hour from midnight in the user's time zone on that date.
#[must_use]
pub fn apply(tasks: &[Task], filter: StatusFilter, now: OffsetDateTime) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task, now)).collect()
}
