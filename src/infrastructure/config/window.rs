//! Daily price window.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::domain::DailyWindow;
use crate::error::{ConfigError, Result};

/// `[price_window]` section.
///
/// Times are local wall-clock `HH:MM` or `HH:MM:SS` in `timezone`; the
/// window includes `start` and excludes `end`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceWindowConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

fn default_timezone() -> String {
    "America/Los_Angeles".into()
}

fn default_start() -> String {
    "18:30".into()
}

fn default_end() -> String {
    "18:40".into()
}

impl Default for PriceWindowConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            start: default_start(),
            end: default_end(),
        }
    }
}

fn parse_time(field: &'static str, raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| {
            ConfigError::InvalidValue {
                field,
                reason: format!("'{raw}': {e}"),
            }
            .into()
        })
}

impl PriceWindowConfig {
    /// Build the window.
    ///
    /// # Errors
    /// Unknown timezone, unparsable time, or `start >= end`.
    pub fn window(&self) -> Result<DailyWindow> {
        let tz: Tz = self.timezone.parse().map_err(|_| ConfigError::InvalidValue {
            field: "price_window.timezone",
            reason: format!("unknown timezone '{}'", self.timezone),
        })?;
        let start = parse_time("price_window.start", &self.start)?;
        let end = parse_time("price_window.end", &self.end)?;
        DailyWindow::try_new(tz, start, end).map_err(|e| {
            ConfigError::InvalidValue {
                field: "price_window",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_pacific_evening() {
        let window = PriceWindowConfig::default().window().unwrap();
        assert_eq!(window.timezone(), chrono_tz::America::Los_Angeles);
        assert_eq!(window.start(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(window.end(), NaiveTime::from_hms_opt(18, 40, 0).unwrap());
    }

    #[test]
    fn seconds_are_accepted() {
        let config = PriceWindowConfig {
            start: "18:30:15".into(),
            ..PriceWindowConfig::default()
        };
        assert_eq!(
            config.window().unwrap().start(),
            NaiveTime::from_hms_opt(18, 30, 15).unwrap()
        );
    }
}
