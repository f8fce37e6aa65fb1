//! Command-line interface definitions.
//!
//! Defines the CLI structure for fplwatch using `clap`: the continuous
//! engine, single cycles with and without dispatch, and a view of the run
//! log.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::paths;

/// Fantasy Premier League change detection and notification engine
#[derive(Parser, Debug)]
#[command(name = "fplwatch")]
#[command(version)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the engine until interrupted
    Run(EngineArgs),

    /// Run a single cycle and dispatch its events
    Once(EngineArgs),

    /// Run a single cycle without dispatching (re-baseline the store)
    Refresh(EngineArgs),

    /// Show recent monitoring runs
    Runs(RunsArgs),
}

/// Where to find configuration and state.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Configuration file
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Database file, overriding the configured one
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Arguments for `fplwatch runs`.
#[derive(Args, Debug, Clone)]
pub struct RunsArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Number of runs to show
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    /// Print runs as JSON lines
    #[arg(long)]
    pub json: bool,
}
