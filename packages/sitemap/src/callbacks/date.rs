//! W3C datetime parsing and formatting.
//!
//! Accepts the W3C profile of ISO 8601 (`1997`, `1997-07`, `1997-07-16`,
//! `1997-07-16T19:20+01:00`, `1997-07-16T19:20:30.45+01:00`), RFC 2822,
//! a plain `YYYY-MM-DD HH:MM:SS` form and unix timestamps, given as
//! integers or as all-digit text. A four-digit text is always a year.
//!
//! Values without an offset are taken as UTC, not as local time, whatever
//! the season: `2020-07-01` renders as `2020-07-01T00:00:00+00:00`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::W3C_DATETIME_FORMAT;
use crate::types::Value;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static YEAR_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(?:-(\d{2}))?$").expect("valid regex"));

/// Offset-aware formats, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Formats without offset, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date-like value.
#[must_use]
pub fn parse_datetime(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::Integer(timestamp) => {
            DateTime::from_timestamp(*timestamp, 0).map(|dt| dt.fixed_offset())
        }
        Value::Text(text) => parse_datetime_str(text).or_else(|| parse_timestamp_str(text)),
        _ => None,
    }
}

/// Parse all-digit text as a unix timestamp in seconds.
fn parse_timestamp_str(text: &str) -> Option<DateTime<FixedOffset>> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let timestamp = digits.parse().ok()?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.fixed_offset())
}

/// Parse a date string.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::callbacks::date::{format_w3c, parse_datetime_str};
///
/// let parsed = parse_datetime_str("2020-01-01").unwrap();
/// assert_eq!(format_w3c(&parsed), "2020-01-01T00:00:00+00:00");
/// assert!(parse_datetime_str("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_datetime_str(input: &str) -> Option<DateTime<FixedOffset>> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    // RFC 3339 requires seconds; W3C allows hh:mm with a trailing Z.
    let with_offset = text
        .strip_suffix('Z')
        .map_or_else(|| text.to_string(), |t| format!("{t}+00:00"));
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
            return Some(dt);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return midnight_utc(date);
    }

    if let Some(caps) = YEAR_MONTH_PATTERN.captures(text) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
        return midnight_utc(NaiveDate::from_ymd_opt(year, month, 1)?);
    }

    DateTime::parse_from_rfc2822(text).ok()
}

/// Format a datetime as `YYYY-MM-DDThh:mm:ss+hh:mm`.
#[must_use]
pub fn format_w3c(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format(W3C_DATETIME_FORMAT).to_string()
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}
