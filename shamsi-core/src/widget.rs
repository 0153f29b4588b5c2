use chrono::{Local, NaiveDateTime};
use std::fmt;

use crate::grid::{build_month, weeks, CalendarDay, MonthGrid};
use crate::holiday::{is_holiday, HolidaySet};
use crate::persian::{to_persian, PersianDate};

/// State the owning screen passes down on every render.
#[derive(Debug, Clone, Copy)]
pub struct CalendarProps<'a> {
    pub selected: Option<NaiveDateTime>,
    pub holidays: &'a HolidaySet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: CalendarDay,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_holiday: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
}

impl MonthView {
    pub fn first_date(&self) -> &PersianDate {
        &self.cells[0].day.date
    }

    pub fn weeks(&self) -> Vec<[Option<DayCell>; 7]> {
        weeks(self.leading_blanks, &self.cells)
    }
}

/// A navigable single-month calendar.
///
/// The widget only owns the view anchor. The selected day and holidays belong to the caller
/// and picking a day is reported through the `on_pick` callback.
pub struct MiniCalendar<'a> {
    view_anchor: NaiveDateTime,
    on_pick: Box<dyn FnMut(NaiveDateTime) + 'a>,
}

impl fmt::Debug for MiniCalendar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniCalendar")
            .field("view_anchor", &self.view_anchor)
            .finish_non_exhaustive()
    }
}

impl<'a> MiniCalendar<'a> {
    pub fn new(
        initial_anchor: Option<NaiveDateTime>,
        on_pick: impl FnMut(NaiveDateTime) + 'a,
    ) -> Self {
        Self {
            view_anchor: initial_anchor.unwrap_or_else(|| Local::now().naive_local()),
            on_pick: Box::new(on_pick),
        }
    }

    pub fn view_anchor(&self) -> NaiveDateTime {
        self.view_anchor
    }

    pub fn grid(&self) -> Option<MonthGrid> {
        build_month(self.view_anchor)
    }

    pub fn next_month(&mut self) {
        match self.grid().and_then(|grid| grid.next_month_start()) {
            Some(next) => self.view_anchor = next,
            None => log::warn!("no month after {}", self.view_anchor),
        }
    }

    pub fn previous_month(&mut self) {
        match self.grid().and_then(|grid| grid.previous_month_end()) {
            Some(previous) => self.view_anchor = previous,
            None => log::warn!("no month before {}", self.view_anchor),
        }
    }

    pub fn jump_to_today(&mut self, now: NaiveDateTime) {
        self.view_anchor = build_month(now).map_or(now, |grid| grid.month_start);
    }

    pub fn go_to(&mut self, instant: NaiveDateTime) {
        self.view_anchor = instant;
    }

    pub fn pick(&mut self, day: &CalendarDay) {
        log::debug!("picked {} ({})", day.date, day.instant);
        (self.on_pick)(day.instant);
    }

    pub fn month_view(&self, props: &CalendarProps<'_>, now: NaiveDateTime) -> Option<MonthView> {
        let grid = self.grid()?;
        let today = to_persian(now);
        let selected = props.selected.and_then(to_persian);

        let cells = grid
            .days
            .iter()
            .map(|day| DayCell {
                day: *day,
                is_today: today.map_or(false, |t| t.same_day(&day.date)),
                is_selected: selected.map_or(false, |s| s.same_day(&day.date)),
                is_holiday: is_holiday(day, props.holidays),
            })
            .collect();

        Some(MonthView {
            year: grid.year(),
            month: grid.month(),
            leading_blanks: grid.weekday_offset,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persian::MAX_YEAR;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn instant(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_navigation_round_trip_from_long_month() {
        // Farvardin 1403 has 31 days.
        let mut calendar = MiniCalendar::new(Some(instant(2024, 4, 5, 10)), |_| {});
        let original = calendar.grid().unwrap();
        assert_eq!(original.days.len(), 31);

        calendar.next_month();
        assert_eq!(calendar.grid().unwrap().month(), 2);

        calendar.previous_month();
        let back = calendar.grid().unwrap();
        assert_eq!((back.year(), back.month()), (original.year(), original.month()));
    }

    #[test]
    fn test_navigation_across_year_boundary() {
        let mut calendar = MiniCalendar::new(Some(instant(2024, 3, 1, 10)), |_| {});
        assert_eq!(calendar.grid().unwrap().month(), 12);

        calendar.next_month();
        let grid = calendar.grid().unwrap();
        assert_eq!((grid.year(), grid.month()), (1403, 1));
        assert_eq!(calendar.view_anchor().date(), NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());

        calendar.previous_month();
        calendar.previous_month();
        let grid = calendar.grid().unwrap();
        assert_eq!((grid.year(), grid.month()), (1402, 11));
    }

    #[test]
    fn test_twelve_steps_forward_is_one_year() {
        let mut calendar = MiniCalendar::new(Some(instant(2023, 6, 1, 0)), |_| {});
        let start = calendar.grid().unwrap();
        for _ in 0..12 {
            calendar.next_month();
        }
        let end = calendar.grid().unwrap();
        assert_eq!(end.year(), start.year() + 1);
        assert_eq!(end.month(), start.month());
    }

    #[test]
    fn test_next_month_stays_in_last_supported_month() {
        let anchor = PersianDate::new(MAX_YEAR, 12, 10)
            .unwrap()
            .to_gregorian()
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut calendar = MiniCalendar::new(Some(anchor), |_| {});

        calendar.next_month();
        assert_eq!(calendar.view_anchor(), anchor);
        let grid = calendar.grid().unwrap();
        assert_eq!((grid.year(), grid.month()), (MAX_YEAR, 12));

        calendar.previous_month();
        let grid = calendar.grid().unwrap();
        assert_eq!((grid.year(), grid.month()), (MAX_YEAR, 11));
    }

    #[test]
    fn test_jump_to_today_lands_on_month_start() {
        let mut calendar = MiniCalendar::new(Some(instant(2020, 1, 1, 0)), |_| {});
        let now = instant(2024, 4, 10, 16);
        calendar.jump_to_today(now);
        assert_eq!(calendar.view_anchor(), instant(2024, 3, 20, 16));
    }

    #[test]
    fn test_facets_compare_persian_days() {
        let holidays = HolidaySet::from_keys(["1403-01-02"]);
        let props = CalendarProps {
            selected: Some(instant(2024, 3, 25, 23)),
            holidays: &holidays,
        };
        let calendar = MiniCalendar::new(Some(instant(2024, 3, 20, 8)), |_| {});
        let view = calendar.month_view(&props, instant(2024, 3, 22, 1)).unwrap();

        assert_eq!((view.year, view.month, view.leading_blanks), (1403, 1, 4));
        assert_eq!(view.first_date().day, 1);

        let today: Vec<u32> = view
            .cells
            .iter()
            .filter(|c| c.is_today)
            .map(|c| c.day.date.day)
            .collect();
        assert_eq!(today, [3]);
        let selected: Vec<u32> = view
            .cells
            .iter()
            .filter(|c| c.is_selected)
            .map(|c| c.day.date.day)
            .collect();
        assert_eq!(selected, [6]);

        assert!(view.cells[1].is_holiday);
        // 1403-01-03 is a Friday.
        assert!(view.cells[2].is_holiday);
        assert!(!view.cells[3].is_holiday);
    }

    #[test]
    fn test_no_facets_outside_displayed_month() {
        let holidays = HolidaySet::new();
        let props = CalendarProps {
            selected: None,
            holidays: &holidays,
        };
        let calendar = MiniCalendar::new(Some(instant(2024, 3, 20, 8)), |_| {});
        let view = calendar.month_view(&props, instant(2024, 6, 1, 0)).unwrap();
        assert!(view.cells.iter().all(|c| !c.is_today && !c.is_selected));
    }

    #[test]
    fn test_view_weeks_have_leading_blanks() {
        let holidays = HolidaySet::new();
        let props = CalendarProps {
            selected: None,
            holidays: &holidays,
        };
        let calendar = MiniCalendar::new(Some(instant(2024, 3, 20, 8)), |_| {});
        let view = calendar.month_view(&props, instant(2024, 3, 20, 8)).unwrap();
        let weeks = view.weeks();
        assert_eq!(weeks[0].iter().take_while(|c| c.is_none()).count(), view.leading_blanks);
    }

    #[test]
    fn test_pick_emits_without_changing_view() {
        let picked = RefCell::new(Vec::new());
        let anchor = instant(2024, 3, 20, 8);
        let mut calendar = MiniCalendar::new(Some(anchor), |at| picked.borrow_mut().push(at));

        let grid = calendar.grid().unwrap();
        calendar.pick(&grid.days[9]);

        assert_eq!(calendar.view_anchor(), anchor);
        drop(calendar);
        assert_eq!(picked.into_inner(), [instant(2024, 3, 29, 8)]);
    }
}
