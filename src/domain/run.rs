//! Monitors and the per-cycle run record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four independent monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorKind {
    LivePerformance,
    PriceWindow,
    FinalBonus,
    StatusChange,
}

impl MonitorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MonitorKind::LivePerformance => "live_performance",
            MonitorKind::PriceWindow => "price_window",
            MonitorKind::FinalBonus => "final_bonus",
            MonitorKind::StatusChange => "status_change",
        }
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live_performance" => Ok(MonitorKind::LivePerformance),
            "price_window" => Ok(MonitorKind::PriceWindow),
            "final_bonus" => Ok(MonitorKind::FinalBonus),
            "status_change" => Ok(MonitorKind::StatusChange),
            other => Err(format!("unknown monitor '{other}'")),
        }
    }
}

/// How the cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// One tick of the continuous loop.
    Monitor,
    /// A single cycle with dispatch.
    Single,
    /// A single cycle without dispatch.
    Refresh,
}

impl RunKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RunKind::Monitor => "monitor",
            RunKind::Single => "single",
            RunKind::Refresh => "refresh",
        }
    }

    /// Whether events produced by this kind of run are handed to notifiers.
    #[must_use]
    pub const fn dispatches(self) -> bool {
        !matches!(self, RunKind::Refresh)
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monitor" => Ok(RunKind::Monitor),
            "single" => Ok(RunKind::Single),
            "refresh" => Ok(RunKind::Refresh),
            other => Err(format!("unknown run kind '{other}'")),
        }
    }
}

/// Outcome of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
    /// Another instance holds the engine lock; nothing was fetched.
    Standby,
}

impl RunStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Standby => "standby",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(RunStatus::Success),
            "failed" => Ok(RunStatus::Failed),
            "standby" => Ok(RunStatus::Standby),
            other => Err(format!("unknown run status '{other}'")),
        }
    }
}

/// Write-once audit record for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringRun {
    pub service_name: String,
    pub kind: RunKind,
    pub monitors: Vec<MonitorKind>,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records_processed: u32,
    pub changes_detected: u32,
    pub notifications_sent: u32,
    pub error_message: Option<String>,
}

impl MonitoringRun {
    /// Comma-separated monitor names for storage and display.
    #[must_use]
    pub fn monitors_label(&self) -> String {
        self.monitors
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
