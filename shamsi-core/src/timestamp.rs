//! Minute-precision timestamp keys.
//!
//! Every stored or compared instant is reduced to a `YYYY-MM-DDTHH:MM` string in local time.
//! The empty string stands for an absent or unparseable value.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use std::cmp::Ordering;

use crate::persian::PersianDate;

pub const NORMALIZED_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_PATTERNS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A date value that knows how to turn itself into a local Gregorian instant.
pub trait ToNaiveDateTime {
    fn to_naive_date_time(&self) -> Option<NaiveDateTime>;
}

impl ToNaiveDateTime for PersianDate {
    fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        self.to_gregorian()?.and_hms_opt(0, 0, 0)
    }
}

pub enum TimestampInput<'a> {
    Native(NaiveDateTime),
    Wrapped(&'a dyn ToNaiveDateTime),
    IsoText(&'a str),
    Invalid,
}

impl<'a> From<NaiveDateTime> for TimestampInput<'a> {
    fn from(instant: NaiveDateTime) -> Self {
        TimestampInput::Native(instant)
    }
}

impl<'a, Tz: TimeZone> From<DateTime<Tz>> for TimestampInput<'a> {
    fn from(instant: DateTime<Tz>) -> Self {
        TimestampInput::Native(instant.with_timezone(&Local).naive_local())
    }
}

impl<'a> From<&'a str> for TimestampInput<'a> {
    fn from(text: &'a str) -> Self {
        TimestampInput::IsoText(text)
    }
}

impl<'a> From<&'a String> for TimestampInput<'a> {
    fn from(text: &'a String) -> Self {
        TimestampInput::IsoText(text.as_str())
    }
}

impl<'a> From<&'a PersianDate> for TimestampInput<'a> {
    fn from(date: &'a PersianDate) -> Self {
        TimestampInput::Wrapped(date)
    }
}

impl<'a, T: Into<TimestampInput<'a>>> From<Option<T>> for TimestampInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(TimestampInput::Invalid, Into::into)
    }
}

impl<'a> TimestampInput<'a> {
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            TimestampInput::Native(instant) => Some(*instant),
            TimestampInput::Wrapped(value) => value.to_naive_date_time(),
            TimestampInput::IsoText(text) => parse_iso(text),
            TimestampInput::Invalid => None,
        }
    }
}

/// Normalizes `input` to its minute-truncated key, or `""` when it has no valid instant.
pub fn normalize<'a>(input: impl Into<TimestampInput<'a>>) -> String {
    let input = input.into();
    match input.resolve() {
        Some(instant) => format_minute(instant).unwrap_or_default(),
        None => {
            if let TimestampInput::IsoText(text) = input {
                log::trace!("unparseable timestamp {:?}", text);
            }
            String::new()
        }
    }
}

/// Inverse of [`normalize`] for non-empty keys.
pub fn parse_normalized(key: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(key, NORMALIZED_FORMAT).ok()
}

/// Orders normalized keys chronologically, placing absent (`""`) keys after all present ones.
pub fn cmp_normalized(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

fn format_minute(instant: NaiveDateTime) -> Option<String> {
    if !(0..=9999).contains(&instant.year()) {
        return None;
    }
    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute()
    ))
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    for pattern in &NAIVE_PATTERNS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
