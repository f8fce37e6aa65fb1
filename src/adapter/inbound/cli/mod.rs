//! CLI module graph.

pub mod command;
pub mod config;
pub mod paths;
pub mod run;
pub mod runs;

use crate::domain::RunKind;
use crate::error::Result;
use command::{Cli, Commands};

/// Dispatch a parsed command line.
///
/// # Errors
/// Configuration errors and failed single cycles are returned to `main`,
/// which exits non-zero.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let (args, kind) = match &cli.command {
        Commands::Run(args) => (args, None),
        Commands::Once(args) => (args, Some(RunKind::Single)),
        Commands::Refresh(args) => (args, Some(RunKind::Refresh)),
        Commands::Runs(runs) => {
            let config = config::load(&runs.engine, cli.json_logs, cli.verbose)?;
            return runs::execute(&config, runs.limit, runs.json);
        }
    };

    let config = config::load(args, cli.json_logs, cli.verbose)?;
    config.init_logging();
    match kind {
        None => run::execute(config).await,
        Some(kind) => run::execute_once(config, kind).await,
    }
}
