use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use flexi_logger::{FileSpec, Logger};
use shamsi_config::{Config, Script};
use shamsi_core::persian::to_persian_digits;
use shamsi_core::{
    normalize, parse_normalized, to_persian, CalendarProps, MiniCalendar, MonthView,
    PersianWeekday,
};
use std::path::PathBuf;

/// Persian (solar Hijri) calendar for the terminal.
#[derive(Debug, Parser)]
#[command(name = "shamsi", author, version, about)]
struct Cli {
    /// Path to config file
    #[arg(short, long = "config")]
    configfile: Option<PathBuf>,

    /// Path to log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the month containing DATE (default: today) and exit
    Show {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Print the minute-precision key of each timestamp
    Normalize {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Print the Persian date of a Gregorian date
    Convert { date: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;
    if let Some(log_file) = &cli.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }
    // Log lines on stderr would tear the alternate screen.
    let _logger = if cli.command.is_some() || cli.log_file.is_some() {
        Some(logger.start()?)
    } else {
        None
    };

    let config = shamsi_config::load_suitable_config(cli.configfile.as_deref())?;
    log::debug!("{:?}", config);

    match cli.command {
        None => shamsi_tui::run(&config),
        Some(Command::Show { date }) => {
            let anchor = match date {
                Some(text) => parse_instant(&text)?,
                None => Local::now().naive_local(),
            };
            show(&config, anchor)
        }
        Some(Command::Normalize { inputs }) => {
            for input in &inputs {
                println!("{}", normalize(input));
            }
            Ok(())
        }
        Some(Command::Convert { date }) => {
            let instant = parse_instant(&date)?;
            let persian = to_persian(instant)
                .ok_or_else(|| anyhow!("{} is outside the supported range", date))?;
            println!(
                "{} {} ({})",
                persian,
                persian.weekday.latin_name(),
                persian.weekday.name()
            );
            Ok(())
        }
    }
}

fn parse_instant(text: &str) -> Result<NaiveDateTime> {
    parse_normalized(&normalize(text)).ok_or_else(|| anyhow!("could not parse date '{}'", text))
}

fn show(config: &Config, anchor: NaiveDateTime) -> Result<()> {
    let holidays = config.holiday_set();
    let props = CalendarProps {
        selected: None,
        holidays: &holidays,
    };
    let calendar = MiniCalendar::new(Some(anchor), |_| {});
    let view = calendar
        .month_view(&props, Local::now().naive_local())
        .ok_or_else(|| anyhow!("{} is outside the supported range", anchor))?;

    print!("{}", format_month(&view, config.script));
    Ok(())
}

/// Plain-text month: today in brackets, holidays marked with `*`.
fn format_month(view: &MonthView, script: Script) -> String {
    let digits = |text: String| match script {
        Script::Persian => to_persian_digits(&text),
        Script::Latin => text,
    };

    let first = view.first_date();
    let month_name = match script {
        Script::Persian => first.month_name(),
        Script::Latin => first.latin_month_name(),
    };
    let mut out = format!("{} {}\n", month_name, digits(first.year.to_string()));

    let header: Vec<String> = PersianWeekday::ALL
        .iter()
        .map(|weekday| match script {
            Script::Persian => format!("{:>4}", weekday.short()),
            Script::Latin => format!("{:>4}", weekday.latin_name()),
        })
        .collect();
    out.push_str(&header.concat());
    out.push('\n');

    for week in view.weeks() {
        for slot in week.iter() {
            let text = match slot {
                Some(cell) => {
                    let day = digits(cell.day.date.day.to_string());
                    let marker = if cell.is_holiday { "*" } else { " " };
                    if cell.is_today {
                        format!("[{:>2}]", day)
                    } else {
                        format!(" {:>2}{}", day, marker)
                    }
                }
                None => "    ".to_string(),
            };
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}
