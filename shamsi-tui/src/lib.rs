use anyhow::Result;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use shamsi_config::{Config, Script};
use shamsi_core::persian::to_persian_digits;
use shamsi_core::{
    normalize, to_persian, CalendarProps, DayCell, HolidaySet, MiniCalendar, MonthView,
    PersianDate, PersianWeekday, WEEKLY_REST_DAY,
};
use std::sync::mpsc::{self, Receiver};
use std::{
    io,
    time::{Duration, Instant},
};

pub struct App {
    calendar: MiniCalendar<'static>,
    picks: Receiver<NaiveDateTime>,
    selected: Option<NaiveDateTime>,
    cursor: NaiveDateTime,
    holidays: HolidaySet,
    script: Script,
}

impl App {
    pub fn new(config: &Config, now: NaiveDateTime) -> Self {
        let (sender, picks) = mpsc::channel();
        let calendar = MiniCalendar::new(Some(now), move |instant| {
            if sender.send(instant).is_err() {
                log::warn!("pick of {} dropped", instant);
            }
        });

        Self {
            calendar,
            picks,
            selected: None,
            cursor: now,
            holidays: config.holiday_set(),
            script: config.script,
        }
    }

    pub fn selected(&self) -> Option<NaiveDateTime> {
        self.selected
    }

    pub fn cursor(&self) -> NaiveDateTime {
        self.cursor
    }

    /// Handles one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, now: NaiveDateTime) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.calendar.next_month();
                self.cursor = self.calendar.view_anchor();
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.calendar.previous_month();
                self.cursor = self.month_start().unwrap_or(self.cursor);
            }
            KeyCode::Char('t') => {
                self.calendar.jump_to_today(now);
                self.cursor = now;
            }
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::Enter => self.pick_cursor(),
            _ => {}
        }
        false
    }

    fn month_start(&self) -> Option<NaiveDateTime> {
        self.calendar.grid().map(|grid| grid.month_start)
    }

    fn move_cursor(&mut self, days: i64) {
        let Some(next) = self.cursor.checked_add_signed(ChronoDuration::days(days)) else {
            return;
        };
        let Some(date) = to_persian(next) else {
            return;
        };
        self.cursor = next;

        let visible = self
            .calendar
            .grid()
            .map_or(false, |grid| grid.find(&date).is_some());
        if !visible {
            self.calendar.go_to(next);
        }
    }

    fn pick_cursor(&mut self) {
        let Some(date) = to_persian(self.cursor) else {
            return;
        };
        if let Some(grid) = self.calendar.grid() {
            if let Some(day) = grid.find(&date) {
                self.calendar.pick(day);
            }
        }
        self.drain_picks();
    }

    fn drain_picks(&mut self) {
        while let Ok(instant) = self.picks.try_recv() {
            log::info!("selected {}", normalize(instant));
            self.selected = Some(instant);
        }
    }

    fn month_view(&self, now: NaiveDateTime) -> Option<MonthView> {
        let props = CalendarProps {
            selected: self.selected,
            holidays: &self.holidays,
        };
        self.calendar.month_view(&props, now)
    }

    fn digits(&self, text: &str) -> String {
        match self.script {
            Script::Persian => to_persian_digits(text),
            Script::Latin => text.to_string(),
        }
    }

    fn weekday_label(&self, weekday: PersianWeekday) -> &'static str {
        match self.script {
            Script::Persian => weekday.short(),
            Script::Latin => weekday.latin_name(),
        }
    }

    fn weekday_name(&self, weekday: PersianWeekday) -> &'static str {
        match self.script {
            Script::Persian => weekday.name(),
            Script::Latin => weekday.latin_name(),
        }
    }

    fn month_title(&self, date: &PersianDate) -> String {
        let name = match self.script {
            Script::Persian => date.month_name(),
            Script::Latin => date.latin_month_name(),
        };
        format!("{}  {}", name, self.digits(&date.year.to_string()))
    }
}

pub fn run(config: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config, Local::now().naive_local());
    let res = run_app(&mut terminal, app, config.tick_rate());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App, tick_rate: Duration) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let now = Local::now().naive_local();
        terminal.draw(|f| ui(f, &app, now))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, now) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn day_style(app: &App, cell: &DayCell) -> Style {
    let mut style = match (cell.is_today, cell.is_selected) {
        (true, true) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        (true, false) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        (false, true) => Style::default().add_modifier(Modifier::REVERSED),
        (false, false) => Style::default(),
    };
    if cell.is_holiday && !cell.is_today {
        style = style.fg(Color::Red);
    }
    if to_persian(app.cursor).map_or(false, |c| c.same_day(&cell.day.date)) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

fn create_month_table<'a>(app: &App, view: &MonthView) -> Table<'a> {
    let header_cells = PersianWeekday::ALL.iter().map(|weekday| {
        let color = if *weekday == WEEKLY_REST_DAY {
            Color::Red
        } else {
            Color::Gray
        };
        Cell::from(app.weekday_label(*weekday)).style(Style::default().fg(color))
    });
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(2);

    let rows: Vec<Row> = view
        .weeks()
        .iter()
        .map(|week| {
            let cells = week.iter().map(|slot| match slot {
                Some(cell) => {
                    let label = app.digits(&cell.day.date.day.to_string());
                    Cell::from(format!(" {} ", label)).style(day_style(app, cell))
                }
                None => Cell::from("   "),
            });
            Row::new(cells).height(2)
        })
        .collect();

    let widths = [Constraint::Percentage(14); 7];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.month_title(view.first_date())),
        )
        .column_spacing(1)
}

fn create_clock(app: &App, now: NaiveDateTime) -> String {
    let date = to_persian(now).map(|d| d.to_string()).unwrap_or_default();
    app.digits(&format!("{}  {}", date, now.format("%H:%M:%S")))
}

fn create_details(app: &App) -> String {
    let mut lines = Vec::new();

    match to_persian(app.cursor) {
        Some(date) => {
            lines.push(format!(
                "{}  {}",
                app.digits(&date.to_string()),
                app.weekday_name(date.weekday)
            ));
            lines.push(format!("Gregorian: {}", app.cursor.format("%Y-%m-%d")));
            if let Some(name) = app.holidays.name_of(&date.key()) {
                lines.push(format!("Holiday: {}", name));
            } else if date.weekday == WEEKLY_REST_DAY {
                lines.push("Weekly rest day".to_string());
            }
        }
        None => lines.push("Date out of range".to_string()),
    }

    lines.push(String::new());
    let selected = normalize(app.selected);
    if selected.is_empty() {
        lines.push("Selected: -".to_string());
    } else {
        lines.push(format!("Selected: {}", selected));
    }

    lines.push(String::new());
    lines.push("←↑↓→ move   Enter pick".to_string());
    lines.push("n/p month   t today   q quit".to_string());
    lines.join("\n")
}

pub fn ui(f: &mut Frame, app: &App, now: NaiveDateTime) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10)])
        .split(main_chunks[0]);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(content_chunks[0]);

    let nav_header = Paragraph::new("← Previous (p)   Today (t)   Next (n) →")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    let clock = Paragraph::new(create_clock(app, now))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(nav_header, header_layout[0]);
    f.render_widget(clock, header_layout[1]);

    match app.month_view(now) {
        Some(view) => f.render_widget(create_month_table(app, &view), content_chunks[1]),
        None => f.render_widget(
            Paragraph::new("This month cannot be shown")
                .block(Block::default().borders(Borders::ALL)),
            content_chunks[1],
        ),
    }

    let details = Paragraph::new(create_details(app))
        .block(Block::default().borders(Borders::ALL).title("Day"))
        .alignment(Alignment::Left);
    f.render_widget(details, main_chunks[1]);
}
