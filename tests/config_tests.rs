//! Loading configuration files from disk.

use std::fs;

use fplwatch::error::{ConfigError, Error};
use fplwatch::infrastructure::config::Config;
use fplwatch::testkit::config::{FULL_CONFIG_TOML, MINIMAL_CONFIG_TOML};

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn loads_full_config_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config::load(write_config(&dir, FULL_CONFIG_TOML)).expect("load config");

    assert_eq!(config.service_name, "fplwatch-test");
    assert_eq!(config.lock.owner(), "test-owner");
    assert_eq!(config.cadence.intervals().live, chrono::Duration::seconds(60));
    assert!(config.notifier.webhook().expect("webhook config").is_none());
}

#[test]
fn minimal_config_gets_production_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config::load(write_config(&dir, MINIMAL_CONFIG_TOML)).expect("load config");

    assert_eq!(config.database, "fplwatch.db");
    assert_eq!(config.source.base_url, "https://fantasy.premierleague.com/api");
    assert!(config.lock.owner().starts_with("fplwatch-"));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::load(write_config(&dir, "[logging\nlevel = ")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn invalid_cadence_names_the_field() {
    let dir = tempfile::tempdir().expect("temp dir");
    let toml = format!("{MINIMAL_CONFIG_TOML}\n[cadence]\nlive_secs = 0\n");
    let err = Config::load(write_config(&dir, &toml)).unwrap_err();
    assert!(err.to_string().contains("cadence.live_secs"), "{err}");
}
