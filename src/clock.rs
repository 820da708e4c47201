//! Date and time plumbing: where `now` comes from and how deadlines are
//! shown and typed.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

use crate::error::{Result, TaskError};

/// Display format for deadlines, e.g. `01/01/2024 10:00`.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Formats accepted when a deadline is typed in, tried in order.
const INPUT_FORMATS: &[&str] = &[
    DISPLAY_FORMAT,
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Source of the current moment.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one moment, for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Renders a deadline the way the task list shows it.
pub fn format_deadline(deadline: &NaiveDateTime) -> String {
    deadline.format(DISPLAY_FORMAT).to_string()
}

/// Parses a typed deadline.
///
/// Blank input means "no deadline" and yields `Ok(None)`. A bare
/// `YYYY-MM-DD` date is taken as midnight of that day.
pub fn parse_deadline(input: &str) -> Result<Option<NaiveDateTime>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    for fmt in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(Some(dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(Some(dt));
        }
    }
    Err(TaskError::InvalidDeadline(input.to_string()))
}

/// Serde helper for optional deadlines in replay scripts: accepts every
/// format [`parse_deadline`] does, plus `null` or a missing field.
pub fn deserialize_deadline<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse_deadline(&s).map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format_deadline(&at(2024, 1, 1, 10, 0)), "01/01/2024 10:00");
    }

    #[test]
    fn test_parse_accepts_display_and_iso_forms() {
        let expected = Some(at(2024, 3, 9, 17, 45));
        assert_eq!(parse_deadline("09/03/2024 17:45").unwrap(), expected);
        assert_eq!(parse_deadline("2024-03-09 17:45").unwrap(), expected);
        assert_eq!(parse_deadline("2024-03-09T17:45").unwrap(), expected);
        assert_eq!(parse_deadline("  2024-03-09T17:45:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        assert_eq!(parse_deadline("2024-03-09").unwrap(), Some(at(2024, 3, 9, 0, 0)));
    }

    #[test]
    fn test_parse_blank_is_no_deadline() {
        assert_eq!(parse_deadline("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_deadline("next tuesday"),
            Err(TaskError::InvalidDeadline("next tuesday".into()))
        );
    }
}
