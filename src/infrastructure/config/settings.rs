//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all engine settings.
//! Configuration is loaded from a TOML file; `FPLWATCH_WEBHOOK_URL` and
//! `FPLWATCH_LOCK_OWNER` override the file so deployments can keep them out
//! of it.
//!
//! # Example
//!
//! ```no_run
//! use fplwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use chrono::Duration;
use serde::Deserialize;
use url::Url;

use super::cadence::{seconds, CadenceConfig};
use super::lock::LockConfig;
use super::logging::LoggingConfig;
use super::notifier::NotifierConfig;
use super::window::PriceWindowConfig;
use crate::adapter::outbound::fpl::FplSourceConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `notifier.webhook_url`.
pub const WEBHOOK_URL_ENV: &str = "FPLWATCH_WEBHOOK_URL";
/// Environment variable overriding `lock.owner`.
pub const LOCK_OWNER_ENV: &str = "FPLWATCH_LOCK_OWNER";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "fplwatch.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Name recorded on every monitoring run.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Provider endpoint and HTTP behavior.
    #[serde(default)]
    pub source: FplSourceConfig,

    /// Monitor intervals and scheduler timing.
    #[serde(default)]
    pub cadence: CadenceConfig,

    /// Daily window in which price changes are published.
    #[serde(default)]
    pub price_window: PriceWindowConfig,

    /// Event delivery.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Advisory lock between engine instances.
    #[serde(default)]
    pub lock: LockConfig,
}

fn default_database_path() -> String {
    "fplwatch.db".to_string()
}

fn default_service_name() -> String {
    "fplwatch".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies environment overrides before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// [`Config::parse_toml`] with an injectable environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(url) = env(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.notifier.webhook_url = Some(url);
        }
        if let Some(owner) = env(LOCK_OWNER_ENV).filter(|v| !v.trim().is_empty()) {
            config.lock.owner = Some(owner);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Every check here is fatal at startup.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "service_name",
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }

        Url::parse(&self.source.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "source.base_url",
            reason: e.to_string(),
        })?;
        if self.source.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.source.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        for (field, value) in self.cadence.intervals_by_name() {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }

        self.price_window.window()?;
        self.notifier.webhook()?;

        if self.lock.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lock.ttl_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Lease TTL.
    #[must_use]
    pub fn lock_ttl(&self) -> Duration {
        seconds(self.lock.ttl_secs)
    }
}
