//! Persian (solar Hijri) calendar core: conversion, minute timestamps, month grids,
//! holidays and the mini calendar state.

pub mod grid;
pub mod holiday;
pub mod persian;
pub mod timestamp;
pub mod widget;

pub use grid::{build_month, CalendarDay, MonthGrid};
pub use holiday::{is_holiday, HolidaySet, WEEKLY_REST_DAY};
pub use persian::{to_persian, PersianDate, PersianWeekday};
pub use timestamp::{cmp_normalized, normalize, parse_normalized, TimestampInput, ToNaiveDateTime};
pub use widget::{CalendarProps, DayCell, MiniCalendar, MonthView};
