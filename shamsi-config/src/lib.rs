mod error;

pub use error::{Error, ErrorKind};

use serde::Deserialize;
use shamsi_core::{HolidaySet, PersianDate};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_PATH_ENV_VAR: &str = "SHAMSI_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("shamsi").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".shamsi.toml"));
    }

    locations
}

/// Loads `explicit` if given, otherwise the first existing default location, otherwise defaults.
pub fn load_suitable_config(explicit: Option<&Path>) -> Result<Config, Error> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                &path.display().to_string(),
            ));
        }
        return Config::load_from_path(path);
    }

    match find_configfile_locations().into_iter().find(|path| path.exists()) {
        Some(path) => Config::load_from_path(&path),
        None => {
            log::info!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Persian,
    Latin,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayEntry {
    pub date: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub script: Script,
    pub tick_rate_ms: u64,
    pub builtin_holidays: bool,
    pub builtin_years: (i32, i32),
    #[serde(rename = "holiday")]
    pub holidays: Vec<HolidayEntry>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            script: Script::Persian,
            tick_rate_ms: 250,
            builtin_holidays: true,
            builtin_years: (1400, 1410),
            holidays: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Config, Error> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_msg(&path.display().to_string()))?;
        let config = Config::from_toml_str(&content)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.tick_rate_ms == 0 {
            return Err(Error::new(
                ErrorKind::InvalidValue,
                "tick_rate_ms must be greater than zero",
            ));
        }
        let (from, to) = self.builtin_years;
        if from > to {
            return Err(Error::new(
                ErrorKind::InvalidValue,
                &format!("builtin_years [{}, {}] is empty", from, to),
            ));
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Builds the holiday set handed to every calendar. Malformed dates are skipped.
    pub fn holiday_set(&self) -> HolidaySet {
        let mut set = if self.builtin_holidays {
            HolidaySet::builtin(self.builtin_years.0..=self.builtin_years.1)
        } else {
            HolidaySet::new()
        };

        for entry in &self.holidays {
            match PersianDate::parse_key(&entry.date) {
                Some(date) => set.insert(date.key(), entry.name.clone()),
                None => log::warn!("ignoring invalid holiday date '{}'", entry.date),
            }
        }

        log::debug!("{} holidays configured", set.len());
        set
    }
}
