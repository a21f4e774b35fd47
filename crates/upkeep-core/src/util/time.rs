//! Timestamp parsing and hour arithmetic.
//!
//! Input tables carry dates in whatever shape the spreadsheet or the web form
//! produced, so parsing is lenient. Output is always the canonical
//! `YYYY-MM-DDTHH:MM:SS` form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{Error, Result};

/// Canonical output format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Canonical output format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the accepted shapes.
///
/// Accepted: RFC 3339 (offset is dropped after conversion to UTC),
/// `YYYY-MM-DDTHH:MM[:SS[.f]]`, `YYYY-MM-DD HH:MM[:SS[.f]]`, and a bare
/// `YYYY-MM-DD` which maps to midnight.
///
/// # Examples
///
/// ```
/// use upkeep_core::util::time::parse_timestamp;
///
/// let ts = parse_timestamp("2024-03-01 08:30").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-01 08:30:00");
/// ```
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::validation("timestamp is empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(Error::validation(format!("'{s}' is not a recognised date or timestamp")))
}

/// Parse a timestamp, attributing any error to `field`.
pub fn parse_timestamp_field(field: &str, input: &str) -> Result<NaiveDateTime> {
    parse_timestamp(input).map_err(|e| retag(field, e))
}

/// Parse an optional timestamp: empty input is `None`.
pub fn parse_optional_timestamp(field: &str, input: &str) -> Result<Option<NaiveDateTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp_field(field, input).map(Some)
}

/// Parse a calendar date. Timestamps are accepted and truncated to their date.
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    parse_timestamp_field(field, s).map(|dt| dt.date())
}

/// Format a timestamp in the canonical form. Sub-second precision is kept
/// only when present, so formatting then parsing is lossless.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format(TIMESTAMP_FORMAT).to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// Format an optional timestamp; `None` becomes an empty string.
pub fn format_optional_timestamp(ts: Option<&NaiveDateTime>) -> String {
    ts.map(format_timestamp).unwrap_or_default()
}

/// Format a date in the canonical form.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed difference `to - from` in fractional hours.
pub fn hours_between(from: &NaiveDateTime, to: &NaiveDateTime) -> f64 {
    let delta = *to - *from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => delta.num_seconds() as f64 / 3_600.0,
    }
}

fn retag(field: &str, err: Error) -> Error {
    match err {
        Error::Validation { field: None, message } => Error::validation_field(field, message),
        other => other,
    }
}
