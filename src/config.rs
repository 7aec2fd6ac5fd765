// Calendar configuration
use chrono::FixedOffset;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::date::{CalendarDate, DayOfWeek};
use crate::date_range::DateRange;
use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%m/%d/%Y";
pub const DEFAULT_MIN_DATE: &str = "01/01/1900";
pub const DEFAULT_MAX_DATE: &str = "01/01/2100";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_week_number: bool,
    pub first_day_of_week: DayOfWeek,
    pub min_date: String, // MM/dd/yyyy
    pub max_date: String,
    pub shown_week_count: usize,
    pub scroll_duration_ms: u32,
    pub adjustment_scroll_duration_ms: u32,
    pub settle_delay_ms: u64,
    pub fading_edge_px: i32,
}

impl Config {
    pub fn new() -> Self {
        Self {
            show_week_number: true,
            first_day_of_week: DayOfWeek::Sunday,
            min_date: DEFAULT_MIN_DATE.to_string(),
            max_date: DEFAULT_MAX_DATE.to_string(),
            shown_week_count: 6,
            scroll_duration_ms: 200,
            adjustment_scroll_duration_ms: 500,
            settle_delay_ms: 40,
            fading_edge_px: 12,
        }
    }

    pub fn load_from_file(path: &str) -> Self {
        let default_config = Self::new();
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {}", path, e);
                    default_config
                }
            },
            Err(_) => default_config,
        }
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the configured bounds at `offset`. A bound that does not
    /// parse falls back to its default.
    pub fn date_range(&self, offset: FixedOffset) -> Result<DateRange> {
        let min = parse_date_or(&self.min_date, DEFAULT_MIN_DATE, offset)?;
        let max = parse_date_or(&self.max_date, DEFAULT_MAX_DATE, offset)?;
        DateRange::new(min, max)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Rows shown per screen, never zero.
    pub fn shown_week_count(&self) -> usize {
        self.shown_week_count.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_date_or(input: &str, fallback: &str, offset: FixedOffset) -> Result<CalendarDate> {
    if let Some(date) = CalendarDate::parse(input, DATE_FORMAT, offset) {
        return Ok(date);
    }
    log::warn!("Date: {} not in format: MM/dd/yyyy", input);
    CalendarDate::parse(fallback, DATE_FORMAT, offset)
        .ok_or_else(|| Error::Configuration(format!("Invalid default date {}", fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.show_week_number);
        assert_eq!(config.first_day_of_week, DayOfWeek::Sunday);
        assert_eq!(config.shown_week_count, 6);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("first_day_of_week = \"Monday\"\nshow_week_number = false\n").unwrap();
        assert_eq!(config.first_day_of_week, DayOfWeek::Monday);
        assert!(!config.show_week_number);
        assert_eq!(config.min_date, DEFAULT_MIN_DATE);
        assert_eq!(config.scroll_duration_ms, 200);
    }

    #[test]
    fn test_bad_date_falls_back() {
        let mut config = Config::new();
        config.min_date = "yesterday".to_string();
        let range = config.date_range(utc()).unwrap();
        assert_eq!(*range.min(), CalendarDate::from_ymd(1900, 1, 1).unwrap());
        assert_eq!(*range.max(), CalendarDate::from_ymd(2100, 1, 1).unwrap());
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let mut config = Config::new();
        config.min_date = "06/01/2024".to_string();
        config.max_date = "01/01/2024".to_string();
        assert!(matches!(config.date_range(utc()), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_shown_week_count_never_zero() {
        let mut config = Config::new();
        config.shown_week_count = 0;
        assert_eq!(config.shown_week_count(), 1);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from_file("/nonexistent/weekview.toml");
        assert_eq!(config.max_date, DEFAULT_MAX_DATE);
    }
}
