use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a task.
///
/// Serialized as a bare JSON number so stored blobs keep the `id:number` shape.
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier that follows this one, or `None` past `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_roundtrip() {
        let parsed: TaskId = " 42 "
            .parse()
            .unwrap_or_else(|err| panic!("must parse task id: {err}"));
        assert_eq!(parsed, TaskId(42));
        assert_eq!(parsed.to_string(), "42");
    }

    #[test]
    fn task_id_serializes_as_number() {
        let json = serde_json::to_string(&TaskId(7))
            .unwrap_or_else(|err| panic!("must serialize task id: {err}"));
        assert_eq!(json, "7");
    }

    #[test]
    fn next_stops_at_the_largest_id() {
        assert_eq!(TaskId(41).next(), Some(TaskId(42)));
        assert_eq!(TaskId(u64::MAX).next(), None);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!("abc".parse::<TaskId>().is_err());
        assert!("-1".parse::<TaskId>().is_err());
    }
}
