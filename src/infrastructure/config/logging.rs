//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl LoggingConfig {
    /// Apply command-line overrides.
    ///
    /// `verbose` raises the level one step per occurrence.
    pub fn apply_cli(&mut self, json: bool, verbose: u8) {
        if json {
            self.format = "json".into();
        }
        self.level = match verbose {
            0 => return,
            1 => "debug".into(),
            _ => "trace".into(),
        };
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let result = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
        if result.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_file() {
        let mut logging = LoggingConfig::default();
        logging.apply_cli(true, 0);
        assert_eq!(logging.format, "json");
        assert_eq!(logging.level, "info");

        logging.apply_cli(false, 2);
        assert_eq!(logging.level, "trace");
    }
}
