use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
///
/// The serialized strings match the labels written by earlier releases
/// (`"Not Started"`, `"Started"`, `"Completed"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not begun (or was paused).
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Work is underway.
    Started,
    /// The task is done.
    Completed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::Started, Self::Completed];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Started => "Started",
            Self::Completed => "Completed",
        }
    }

    /// Status after a start/pause toggle.
    ///
    /// Only `Started` flips back to `NotStarted`; anything else becomes `Started`.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Started => Self::NotStarted,
            Self::NotStarted | Self::Completed => Self::Started,
        }
    }

    /// Parse a user-facing token such as `not-started`, `Started` or `done`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "not_started" | "notstarted" | "todo" => Some(Self::NotStarted),
            "started" | "in_progress" => Some(Self::Started),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
