//! Date/time text parsing for `yyyy-M-d H:mm:ss` values.
//!
//! Parsing is strict: the year has exactly four digits, every other field one
//! or two digits, and calendar ranges are validated (no month 13, no hour 24).
//! The time portion may be omitted, in which case it defaults to midnight.

use crate::access::DataType;
use crate::expression::{CompileError, CompileResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Format produced by [`format_date`]
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parser for textual date/time values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    allow_date_only: bool,
}

impl Default for DateParser {
    fn default() -> Self {
        Self {
            allow_date_only: true,
        }
    }
}

impl DateParser {
    pub fn new(allow_date_only: bool) -> Self {
        Self { allow_date_only }
    }

    /// Parse `yyyy-M-d[ H:mm:ss]`
    pub fn parse(&self, text: &str) -> CompileResult<NaiveDateTime> {
        let fail = |reason: String| CompileError::Parse {
            input: text.to_string(),
            target: DataType::Date,
            reason,
        };

        let trimmed = text.trim();
        let (date_part, time_part) = match trimmed.split_once(' ') {
            Some((date, time)) => (date, Some(time)),
            None => (trimmed, None),
        };

        let fields: Vec<&str> = date_part.split('-').collect();
        if fields.len() != 3 {
            return Err(fail(format!("expected yyyy-M-d, found '{}'", date_part)));
        }
        let year = parse_field(fields[0], "year", 4, 4).map_err(fail)?;
        let month = parse_field(fields[1], "month", 1, 2).map_err(fail)?;
        let day = parse_field(fields[2], "day", 1, 2).map_err(fail)?;

        if !(1..=12).contains(&month) {
            return Err(fail(format!("month {} is out of range", month)));
        }
        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| fail(format!("day {} is out of range for {}-{}", day, year, month)))?;

        let (hour, minute, second) = match time_part {
            Some(time) => {
                let fields: Vec<&str> = time.split(':').collect();
                if fields.len() != 3 {
                    return Err(fail(format!("expected H:mm:ss, found '{}'", time)));
                }
                (
                    parse_field(fields[0], "hour", 1, 2).map_err(fail)?,
                    parse_field(fields[1], "minute", 1, 2).map_err(fail)?,
                    parse_field(fields[2], "second", 1, 2).map_err(fail)?,
                )
            }
            None if self.allow_date_only => (0, 0, 0),
            None => return Err(fail("time portion is required".to_string())),
        };

        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            fail(format!(
                "time {}:{:02}:{:02} is out of range",
                hour, minute, second
            ))
        })?;

        Ok(NaiveDateTime::new(date, time))
    }
}

/// Parse one all-digit field with a bounded width
fn parse_field(text: &str, name: &str, min_digits: usize, max_digits: usize) -> Result<u32, String> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("{} '{}' is not a number", name, text));
    }
    if text.len() < min_digits || text.len() > max_digits {
        return Err(if min_digits == max_digits {
            format!("{} '{}' must have {} digits", name, text, min_digits)
        } else {
            format!(
                "{} '{}' must have {} to {} digits",
                name, text, min_digits, max_digits
            )
        });
    }
    text.parse::<u32>()
        .map_err(|e| format!("{} '{}': {}", name, text, e))
}

/// Render a date in [`CANONICAL_FORMAT`]
pub fn format_date(value: &NaiveDateTime) -> String {
    value.format(CANONICAL_FORMAT).to_string()
}
