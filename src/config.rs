// Application configuration: defaults, optional JSON file, environment overrides

use serde::Deserialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid flight number range: {min}..={max}")]
    InvalidFlightRange { min: u16, max: u16 },
}

// Language of the console prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ru" | "russian" => Ok(Locale::Ru),
            _ => Err(ConfigError::InvalidLocale(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locale: Locale,
    pub log_filter: String,
    pub flight_number_min: u16,
    pub flight_number_max: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            log_filter: "flight_booking_facade=info".to_string(),
            flight_number_min: 100,
            flight_number_max: 999,
        }
    }
}

impl AppConfig {
    pub const LOCALE_ENV: &'static str = "BOOKING_LOCALE";
    pub const LOG_ENV: &'static str = "BOOKING_LOG";

    // Defaults, then the file if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    // Environment lookup is injected so tests don't touch the process env
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup(Self::LOCALE_ENV) {
            self.locale = locale.parse()?;
        }
        if let Some(filter) = lookup(Self::LOG_ENV) {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flight_number_min > self.flight_number_max {
            return Err(ConfigError::InvalidFlightRange {
                min: self.flight_number_min,
                max: self.flight_number_max,
            });
        }
        Ok(())
    }

    pub fn flight_numbers(&self) -> RangeInclusive<u16> {
        self.flight_number_min..=self.flight_number_max
    }
}
