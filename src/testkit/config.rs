//! Canonical test configuration.

/// A complete configuration with every section present and valid.
pub const FULL_CONFIG_TOML: &str = r#"
database = "fplwatch-test.db"
service_name = "fplwatch-test"

[logging]
level = "debug"
format = "pretty"

[source]
base_url = "http://127.0.0.1:9/api"
timeout_ms = 2000
connect_timeout_ms = 1000
retry_max_attempts = 2
retry_backoff_ms = 10

[cadence]
live_secs = 60
price_secs = 300
bonus_secs = 300
status_secs = 3600
idle_secs = 3600
fixture_refresh_secs = 900
kickoff_lead_secs = 120

[price_window]
timezone = "America/Los_Angeles"
start = "18:30"
end = "18:40"

[notifier]
log = true

[lock]
owner = "test-owner"
ttl_secs = 300
"#;

/// The smallest configuration that loads: everything else defaults.
pub const MINIMAL_CONFIG_TOML: &str = r#"
[logging]
level = "info"
format = "pretty"
"#;
