//! Date-time parsing and formatting.
//!
//! Timestamps cross the wire as strings, not numbers, and arrive in a
//! handful of shapes: the canonical `yyyy-MM-dd HH:mm:00` the app
//! writes, ISO-8601 with a `T` separator, with or without seconds,
//! and occasionally with a zone suffix. Parsing is explicit here; a
//! string that matches none of the known shapes is a typed error, never
//! a silently mangled value.
//!
//! Display formatting is fixed to the Brazilian plant conventions:
//! `dd/MM/yyyy` dates and 24-hour `HH:mm` times.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Canonical wire format for registration timestamps. Seconds are
/// always written as `00`; the backend never sees finer precision.
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:00";

/// Plain calendar date format used by search bounds.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Timestamp shapes accepted on read, most specific first. `%.f`
/// matches an optional fractional-seconds part, including none.
const READ_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("unrecognized timestamp {0:?}")]
    Unparseable(String),
    #[error("unrecognized date {0:?}, expected yyyy-MM-dd")]
    BadDate(String),
    #[error("hour {0} out of range 0..=23")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range 0..=59")]
    MinuteOutOfRange(u32),
}

/// Parse any accepted timestamp shape into a naive date-time.
///
/// Zone-suffixed input keeps its literal clock digits: a record saved
/// as `14:30` is shown as `14:30` no matter which zone tagged it. The
/// timezone is bookkeeping the display deliberately ignores.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DateTimeError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for format in READ_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, WIRE_DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(DateTimeError::Unparseable(raw.to_string()))
}

/// Parse a plain `yyyy-MM-dd` calendar date.
pub fn parse_plain_date(raw: &str) -> Result<NaiveDate, DateTimeError> {
    NaiveDate::parse_from_str(raw.trim(), WIRE_DATE_FORMAT)
        .map_err(|_| DateTimeError::BadDate(raw.to_string()))
}

/// Date part of a timestamp, formatted `dd/MM/yyyy`.
pub fn local_date(raw: &str) -> Result<String, DateTimeError> {
    Ok(parse_timestamp(raw)?.format(DISPLAY_DATE_FORMAT).to_string())
}

/// Time part of a timestamp, formatted 24-hour `HH:mm`.
pub fn local_time(raw: &str) -> Result<String, DateTimeError> {
    Ok(parse_timestamp(raw)?.format(DISPLAY_TIME_FORMAT).to_string())
}

/// Current local time as a wire timestamp with seconds zeroed.
pub fn now_datetime_string() -> String {
    Local::now().format(WIRE_DATETIME_FORMAT).to_string()
}

/// Build a wire timestamp from a calendar date and a clock reading.
pub fn compose_datetime(date: &str, hour: u32, minute: u32) -> Result<String, DateTimeError> {
    if hour > 23 {
        return Err(DateTimeError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(DateTimeError::MinuteOutOfRange(minute));
    }
    let date = parse_plain_date(date)?;
    Ok(format!("{} {:02}:{:02}:00", date.format(WIRE_DATE_FORMAT), hour, minute))
}

/// Re-emit any accepted timestamp in the canonical wire format,
/// dropping seconds and finer precision.
pub fn canonicalize(raw: &str) -> Result<String, DateTimeError> {
    Ok(parse_timestamp(raw)?.format(WIRE_DATETIME_FORMAT).to_string())
}
