use chrono::{Days, NaiveDateTime};

use crate::persian::{to_persian, PersianDate};

/// Upper bound on the length of any Persian month.
const MAX_MONTH_LEN: usize = 31;

/// One day of a rendered Persian month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub instant: NaiveDateTime,
    pub date: PersianDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub days: Vec<CalendarDay>,
    pub month_start: NaiveDateTime,
    /// Number of empty cells before day 1 in a Saturday-first week.
    pub weekday_offset: usize,
}

/// Builds the Persian month containing `anchor`.
///
/// Returns `None` when `anchor` itself cannot be converted. Days next to a convertible anchor
/// that fall outside the supported range are left out of the grid.
pub fn build_month(anchor: NaiveDateTime) -> Option<MonthGrid> {
    let mut start = CalendarDay {
        instant: anchor,
        date: to_persian(anchor)?,
    };

    while start.date.day > 1 {
        match previous_day(&start) {
            Some(day) => start = day,
            None => break,
        }
    }

    let mut days = Vec::with_capacity(MAX_MONTH_LEN);
    days.push(start);
    while days.len() < MAX_MONTH_LEN {
        let next = match days.last().and_then(next_day) {
            Some(next) => next,
            None => break,
        };
        if next.date.month != start.date.month || next.date.year != start.date.year {
            break;
        }
        days.push(next);
    }

    log::trace!(
        "built month {}-{:02} with {} days",
        start.date.year,
        start.date.month,
        days.len()
    );

    Some(MonthGrid {
        month_start: start.instant,
        weekday_offset: start.date.weekday.index(),
        days,
    })
}

impl CalendarDay {
    pub fn at(instant: NaiveDateTime) -> Option<Self> {
        Some(Self {
            instant,
            date: to_persian(instant)?,
        })
    }
}

impl MonthGrid {
    pub fn year(&self) -> i32 {
        self.days[0].date.year
    }

    pub fn month(&self) -> u32 {
        self.days[0].date.month
    }

    pub fn first(&self) -> &CalendarDay {
        &self.days[0]
    }

    pub fn last(&self) -> &CalendarDay {
        &self.days[self.days.len() - 1]
    }

    /// First instant of the following month, found from this month's own boundary. `None` when
    /// that day cannot be converted.
    pub fn next_month_start(&self) -> Option<NaiveDateTime> {
        next_day(self.last()).map(|day| day.instant)
    }

    /// Last instant of the preceding month, or `None` when that day cannot be converted.
    pub fn previous_month_end(&self) -> Option<NaiveDateTime> {
        previous_day(self.first()).map(|day| day.instant)
    }

    pub fn find(&self, date: &PersianDate) -> Option<&CalendarDay> {
        self.days.iter().find(|day| day.date.same_day(date))
    }
}

/// Lays `items` out in Saturday-first rows starting at column `offset`, padding the first and
/// last week with `None`.
pub(crate) fn weeks<T: Copy>(offset: usize, items: &[T]) -> Vec<[Option<T>; 7]> {
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut column = offset;
    for item in items {
        week[column] = Some(*item);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}

fn previous_day(day: &CalendarDay) -> Option<CalendarDay> {
    CalendarDay::at(day.instant.checked_sub_days(Days::new(1))?)
}

fn next_day(day: &CalendarDay) -> Option<CalendarDay> {
    CalendarDay::at(day.instant.checked_add_days(Days::new(1))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persian::{month_length, PersianWeekday, MAX_YEAR, MIN_YEAR};
    use chrono::NaiveDate;

    fn instant(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_month_shape_for_many_anchors() {
        let mut anchor = instant(2023, 1, 1);
        while anchor < instant(2026, 1, 1) {
            let grid = build_month(anchor).unwrap();
            let first = grid.first().date;

            assert_eq!(first.day, 1);
            assert_eq!(grid.weekday_offset, first.weekday.index());
            assert!(grid.weekday_offset <= 6);
            assert_eq!(
                grid.days.len() as u32,
                month_length(first.year, first.month).unwrap()
            );
            for pair in grid.days.windows(2) {
                assert_eq!(pair[0].date.year, pair[1].date.year);
                assert_eq!(pair[0].date.month, pair[1].date.month);
                assert_eq!(pair[1].date.day, pair[0].date.day + 1);
                assert_eq!(
                    pair[0].instant.checked_add_days(Days::new(1)),
                    Some(pair[1].instant)
                );
            }
            assert!(grid.find(&to_persian(anchor).unwrap()).is_some());

            anchor = anchor.checked_add_days(Days::new(1)).unwrap();
        }
    }

    #[test]
    fn test_short_esfand() {
        // 1402-12-10
        let grid = build_month(instant(2024, 2, 29)).unwrap();
        assert_eq!((grid.year(), grid.month()), (1402, 12));
        assert_eq!(grid.days.len(), 29);
        assert_eq!(grid.last().date.day, 29);
        assert_eq!(grid.month_start.date(), NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());

        let after = to_persian(instant(2024, 3, 20)).unwrap();
        assert_eq!(after.ymd(), (1403, 1, 1));
        assert_eq!(
            grid.next_month_start().map(|i| i.date()),
            NaiveDate::from_ymd_opt(2024, 3, 20)
        );
    }

    #[test]
    fn test_leap_esfand_has_thirty_days() {
        let grid = build_month(instant(2025, 3, 1)).unwrap();
        assert_eq!((grid.year(), grid.month()), (1403, 12));
        assert_eq!(grid.days.len(), 30);
    }

    #[test]
    fn test_month_start_keeps_time_of_day() {
        let grid = build_month(instant(2024, 4, 10)).unwrap();
        assert_eq!(grid.month_start, instant(2024, 3, 20));
        assert_eq!(grid.first().date.weekday, PersianWeekday::Chaharshanbeh);
        assert_eq!(grid.weekday_offset, 4);
    }

    #[test]
    fn test_weeks_layout() {
        // Farvardin 1403 starts on a Wednesday and has 31 days.
        let grid = build_month(instant(2024, 3, 20)).unwrap();
        let weeks = super::weeks(grid.weekday_offset, &grid.days);
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(weeks[0][4].map(|d| d.date.day), Some(1));
        assert_eq!(weeks[4][6].map(|d| d.date.day), Some(31));
        let filled = weeks.iter().flatten().filter(|d| d.is_some()).count();
        assert_eq!(filled, 31);

        // Ordibehesht 1403 starts on a Saturday.
        let grid = build_month(instant(2024, 4, 20)).unwrap();
        let weeks = super::weeks(grid.weekday_offset, &grid.days);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0].map(|d| d.date.day), Some(1));
        assert_eq!(weeks[4][2].map(|d| d.date.day), Some(31));
        assert!(weeks[4][3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_unconvertible_anchor() {
        assert!(build_month(instant(10000, 1, 1)).is_none());
    }

    #[test]
    fn test_last_supported_month_has_no_successor() {
        let last_day = month_length(MAX_YEAR, 12).unwrap();
        let anchor = PersianDate::new(MAX_YEAR, 12, 1)
            .unwrap()
            .to_gregorian()
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let grid = build_month(anchor).unwrap();

        assert_eq!((grid.year(), grid.month()), (MAX_YEAR, 12));
        assert_eq!(grid.days.len() as u32, last_day);
        assert_eq!(grid.last().date.day, last_day);
        let after = grid.last().instant.checked_add_days(Days::new(1)).unwrap();
        assert_eq!(to_persian(after), None);
        assert_eq!(grid.next_month_start(), None);
        assert!(grid.previous_month_end().is_some());
    }

    #[test]
    fn test_first_supported_month_has_no_predecessor() {
        let anchor = PersianDate::new(MIN_YEAR, 1, 15)
            .unwrap()
            .to_gregorian()
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let grid = build_month(anchor).unwrap();

        assert_eq!(grid.first().date.ymd(), (MIN_YEAR, 1, 1));
        assert_eq!(grid.previous_month_end(), None);
        assert!(grid.next_month_start().is_some());
    }
}
