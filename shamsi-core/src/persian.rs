//! Gregorian to Persian (solar Hijri) date conversion.
//!
//! Calendar arithmetic is delegated to the Persian calendar of `icu_calendar`: a 33-year leap rule
//! corrected to the vernal equinox at 52.5°E for 1178..=3000 AP, so Nowruz falls on the dates
//! published by the University of Tehran.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use icu_calendar::cal::Persian;
use icu_calendar::types::Weekday;
use icu_calendar::{Date, Iso};
use std::fmt;

pub const MIN_YEAR: i32 = 1;
/// Last Persian year lying wholly inside the ISO years 1..=9999 that `icu_calendar` accepts.
pub const MAX_YEAR: i32 = 9377;

pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

pub const LATIN_MONTH_NAMES: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// Days of the Persian week, Saturday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersianWeekday {
    Shanbeh,
    Yekshanbeh,
    Doshanbeh,
    Seshanbeh,
    Chaharshanbeh,
    Panjshanbeh,
    Jomeh,
}

impl PersianWeekday {
    pub const ALL: [PersianWeekday; 7] = [
        PersianWeekday::Shanbeh,
        PersianWeekday::Yekshanbeh,
        PersianWeekday::Doshanbeh,
        PersianWeekday::Seshanbeh,
        PersianWeekday::Chaharshanbeh,
        PersianWeekday::Panjshanbeh,
        PersianWeekday::Jomeh,
    ];

    /// Column of this weekday in a Saturday-first grid.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PersianWeekday::Shanbeh => "شنبه",
            PersianWeekday::Yekshanbeh => "یکشنبه",
            PersianWeekday::Doshanbeh => "دوشنبه",
            PersianWeekday::Seshanbeh => "سه‌شنبه",
            PersianWeekday::Chaharshanbeh => "چهارشنبه",
            PersianWeekday::Panjshanbeh => "پنجشنبه",
            PersianWeekday::Jomeh => "جمعه",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            PersianWeekday::Shanbeh => "ش",
            PersianWeekday::Yekshanbeh => "ی",
            PersianWeekday::Doshanbeh => "د",
            PersianWeekday::Seshanbeh => "س",
            PersianWeekday::Chaharshanbeh => "چ",
            PersianWeekday::Panjshanbeh => "پ",
            PersianWeekday::Jomeh => "ج",
        }
    }

    pub fn latin_name(self) -> &'static str {
        match self {
            PersianWeekday::Shanbeh => "Sat",
            PersianWeekday::Yekshanbeh => "Sun",
            PersianWeekday::Doshanbeh => "Mon",
            PersianWeekday::Seshanbeh => "Tue",
            PersianWeekday::Chaharshanbeh => "Wed",
            PersianWeekday::Panjshanbeh => "Thu",
            PersianWeekday::Jomeh => "Fri",
        }
    }
}

impl From<Weekday> for PersianWeekday {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Saturday => PersianWeekday::Shanbeh,
            Weekday::Sunday => PersianWeekday::Yekshanbeh,
            Weekday::Monday => PersianWeekday::Doshanbeh,
            Weekday::Tuesday => PersianWeekday::Seshanbeh,
            Weekday::Wednesday => PersianWeekday::Chaharshanbeh,
            Weekday::Thursday => PersianWeekday::Panjshanbeh,
            Weekday::Friday => PersianWeekday::Jomeh,
        }
    }
}

/// Persian calendar fields of a single civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: PersianWeekday,
}

impl PersianDate {
    /// Builds a validated Persian date; the weekday is derived from the Gregorian equivalent.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = persian_of(year, month, day)?;
        Some(Self {
            year,
            month,
            day,
            weekday: date.weekday().into(),
        })
    }

    /// Parses a `YYYY-MM-DD` key in Persian fields.
    pub fn parse_key(key: &str) -> Option<Self> {
        let mut parts = key.trim().splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        Self::new(year, month, day)
    }

    pub fn key(&self) -> String {
        persian_key(self.year, self.month, self.day)
    }

    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    pub fn same_day(&self, other: &PersianDate) -> bool {
        self.ymd() == other.ymd()
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }

    pub fn latin_month_name(&self) -> &'static str {
        LATIN_MONTH_NAMES[self.month as usize - 1]
    }

    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        let iso = persian_of(self.year, self.month, self.day)?.to_calendar(Iso);
        NaiveDate::from_ymd_opt(
            iso.year().extended_year(),
            iso.month().ordinal.into(),
            iso.day_of_month().0.into(),
        )
    }
}

impl fmt::Display for PersianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Replaces ASCII digits with Extended Arabic-Indic (Persian) digits.
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

pub fn persian_key(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Persian fields of the civil day `instant` falls on, or `None` when the day lies outside
/// the supported year range.
pub fn to_persian(instant: NaiveDateTime) -> Option<PersianDate> {
    to_persian_date(instant.date())
}

pub fn to_persian_date(date: NaiveDate) -> Option<PersianDate> {
    let iso = Date::try_new_iso(
        date.year(),
        u8::try_from(date.month()).ok()?,
        u8::try_from(date.day()).ok()?,
    )
    .ok()?;
    let persian = iso.to_calendar(Persian);
    let year = persian.year().extended_year();
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    Some(PersianDate {
        year,
        month: persian.month().ordinal.into(),
        day: persian.day_of_month().0.into(),
        weekday: persian.weekday().into(),
    })
}

pub fn is_leap_year(year: i32) -> bool {
    matches!(persian_of(year, 1, 1), Some(date) if date.is_in_leap_year())
}

pub fn month_length(year: i32, month: u32) -> Option<u32> {
    persian_of(year, month, 1).map(|date| date.days_in_month().into())
}

fn persian_of(year: i32, month: u32, day: u32) -> Option<Date<Persian>> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    Date::try_new_persian(year, u8::try_from(month).ok()?, u8::try_from(day).ok()?).ok()
}
