use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::grid::CalendarDay;
use crate::persian::{persian_key, PersianWeekday};

/// Friday is a non-working day every week.
pub const WEEKLY_REST_DAY: PersianWeekday = PersianWeekday::Jomeh;

/// Public holidays fixed to the solar calendar: (month, day, name).
const FIXED_SOLAR: &[(u32, u32, &str)] = &[
    (1, 1, "Nowruz"),
    (1, 2, "Nowruz"),
    (1, 3, "Nowruz"),
    (1, 4, "Nowruz"),
    (1, 12, "Islamic Republic Day"),
    (1, 13, "Sizdah Bedar"),
    (3, 14, "Death of Khomeini"),
    (3, 15, "15 Khordad uprising"),
    (11, 22, "Revolution Day"),
    (12, 29, "Oil Nationalization Day"),
];

/// Persian date keys (`YYYY-MM-DD`) of non-working days, each with an optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    days: HashMap<String, Option<String>>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            days: keys.into_iter().map(|key| (key.into(), None)).collect(),
        }
    }

    /// The fixed solar public holidays for every year in `years`.
    pub fn builtin(years: RangeInclusive<i32>) -> Self {
        let mut set = Self::new();
        for year in years {
            for &(month, day, name) in FIXED_SOLAR {
                set.insert(persian_key(year, month, day), Some(name.to_string()));
            }
        }
        set
    }

    pub fn insert(&mut self, key: impl Into<String>, name: Option<String>) {
        self.days.insert(key.into(), name);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.days.contains_key(key)
    }

    pub fn name_of(&self, key: &str) -> Option<&str> {
        self.days.get(key).and_then(|name| name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

pub fn is_holiday(day: &CalendarDay, holidays: &HolidaySet) -> bool {
    day.date.weekday == WEEKLY_REST_DAY || holidays.contains(&day.date.key())
}
