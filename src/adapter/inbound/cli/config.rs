//! Configuration resolution shared by all commands.

use crate::adapter::inbound::cli::command::EngineArgs;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load the config file and apply command-line overrides.
///
/// # Errors
/// Any [`ConfigError`](crate::error::ConfigError); callers treat these as
/// fatal.
pub fn load(args: &EngineArgs, json_logs: bool, verbose: u8) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    if let Some(database) = &args.database {
        config.database = database.to_string_lossy().into_owned();
    }
    config.logging.apply_cli(json_logs, verbose);
    Ok(config)
}
