//! Handler for `runs`.

use tabled::{Table, Tabled};

use crate::adapter::outbound::sqlite::SqliteRunLog;
use crate::domain::MonitoringRun;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_database;
use crate::infrastructure::config::Config;
use crate::port::RunLog;

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "Started (UTC)")]
    started: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Monitors")]
    monitors: String,
    #[tabled(rename = "Records")]
    records: u32,
    #[tabled(rename = "Changes")]
    changes: u32,
    #[tabled(rename = "Sent")]
    sent: u32,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&MonitoringRun> for RunRow {
    fn from(run: &MonitoringRun) -> Self {
        Self {
            started: run.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind: run.kind.to_string(),
            status: run.status.to_string(),
            monitors: run.monitors_label(),
            records: run.records_processed,
            changes: run.changes_detected,
            sent: run.notifications_sent,
            error: run.error_message.clone().unwrap_or_default(),
        }
    }
}

/// Print the most recent runs.
pub fn execute(config: &Config, limit: usize, json: bool) -> Result<()> {
    let log = SqliteRunLog::new(open_database(config)?);
    let runs = log.recent_runs(limit)?;

    if json {
        for run in &runs {
            println!("{}", serde_json::to_string(run)?);
        }
        return Ok(());
    }

    if runs.is_empty() {
        println!("No runs recorded");
        return Ok(());
    }

    let rows: Vec<RunRow> = runs.iter().map(RunRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}
