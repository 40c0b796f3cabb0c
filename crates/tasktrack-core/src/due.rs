//! Parsing and display of due dates.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

/// Error returned when a due date cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid due date '{input}': expected RFC 3339 or YYYY-MM-DD")]
pub struct DueDateParseError {
    /// The rejected input.
    pub input: String,
}

/// Parse a due date given either as an RFC 3339 timestamp or as a bare
/// `YYYY-MM-DD` calendar date (midnight in `offset`).
///
/// # Errors
/// Returns an error if the input matches neither form.
pub fn parse_due_date(input: &str, offset: UtcOffset) -> Result<OffsetDateTime, DueDateParseError> {
    let trimmed = input.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map(|date| date.with_time(Time::MIDNIGHT).assume_offset(offset))
        .map_err(|_| DueDateParseError {
            input: input.to_owned(),
        })
}

/// Render a due date as `dd/mm/yy` in `offset`, or `No due date`.
#[must_use]
pub fn format_due_date(due: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    let Some(due) = due else {
        return "No due date".to_owned();
    };
    let local = due.checked_to_offset(offset).unwrap_or(due);
    local
        .format(format_description!("[day]/[month]/[year repr:last_two]"))
        .unwrap_or_else(|_| local.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn parses_rfc3339_with_millis() {
        let parsed = parse_due_date("2024-05-01T10:00:00.000Z", UtcOffset::UTC)
            .unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(parsed, datetime!(2024-05-01 10:00 UTC));
    }

    #[test]
    fn parses_calendar_date_in_offset() {
        let parsed = parse_due_date("2024-05-01", offset!(+09:00))
            .unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(parsed, datetime!(2024-05-01 00:00 +09:00));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_due_date("next tuesday", UtcOffset::UTC).is_err());
    }

    #[test]
    fn formats_like_en_gb_short_date() {
        let due = Some(datetime!(2024-05-01 23:30 UTC));
        assert_eq!(format_due_date(due, UtcOffset::UTC), "01/05/24");
        assert_eq!(format_due_date(due, offset!(+02:00)), "02/05/24");
        assert_eq!(format_due_date(None, UtcOffset::UTC), "No due date");
    }
}
