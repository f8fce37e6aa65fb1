//! Path utilities for fplwatch.
//!
//! Defaults live under `~/.fplwatch/`:
//! - `~/.fplwatch/config.toml` - main configuration
//! - `~/.fplwatch/fplwatch.db` - snapshot database

use std::path::PathBuf;

/// Returns the fplwatch home directory (`~/.fplwatch/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fplwatch")
}

/// Returns the default config file path (`~/.fplwatch/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.fplwatch/fplwatch.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("fplwatch.db")
}
