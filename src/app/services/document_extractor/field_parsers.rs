//! Field parsing utilities for segment values
//!
//! Date, timestamp and value-type coercion helpers. Every helper fails
//! softly: input that cannot be converted yields `None` (or the original
//! text) instead of an error, and no invalid calendar value is ever built.

use crate::app::models::ObservationValue;
use crate::constants::NUMERIC_VALUE_TYPE;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})").expect("valid date regex"));

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):?(\d{2})(?::?(\d{2}))?$").expect("valid time regex")
});

/// Parse a calendar date from the leading `YYYYMMDD` digits of a field
///
/// Longer date/time values are accepted; only the first eight digits are
/// read. Out-of-range months or days yield `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let captures = DATE_PREFIX.captures(value.trim())?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        warn!("Discarding out-of-range date '{}'", value);
    }
    date
}

/// Parse a date field into a UTC timestamp at midnight
pub fn parse_date_utc(value: &str) -> Option<DateTime<Utc>> {
    parse_date(value)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Parse a time of day in `HH:MM[:SS]` or `HHMM[SS]` form
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let captures = TIME_OF_DAY.captures(value.trim())?;
    let hour = captures[1].parse::<u32>().ok()?;
    let minute = captures[2].parse::<u32>().ok()?;
    let second = captures
        .get(3)
        .map_or(Some(0), |s| s.as_str().parse::<u32>().ok())?;

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Combine a date field and a separate time field into a UTC timestamp
///
/// Both parts are required; either one missing or invalid yields `None`.
pub fn parse_date_time_utc(date: Option<&str>, time: Option<&str>) -> Option<DateTime<Utc>> {
    let date = parse_date(date?)?;
    let time = parse_time(time?)?;
    Some(date.and_time(time).and_utc())
}

/// Apply value-type coercion to an observation value
///
/// Numeric-typed values that parse to a finite number become
/// [`ObservationValue::Number`]; everything else keeps the original text.
pub fn coerce_value(value_type: Option<&str>, value: &str) -> ObservationValue {
    if value_type == Some(NUMERIC_VALUE_TYPE) {
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => return ObservationValue::Number(number),
            _ => debug!("Numeric observation value '{}' kept as text", value),
        }
    }
    ObservationValue::Text(value.to_string())
}

/// Split a `last^first` style value into its first two components
pub fn split_pair(value: Option<&str>, separator: char) -> (Option<String>, Option<String>) {
    let mut parts = value.unwrap_or_default().split(separator);
    let first = non_empty(parts.next());
    let second = non_empty(parts.next());
    (first, second)
}

/// Own a string slice, treating empty as absent
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
