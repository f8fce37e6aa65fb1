//! Availability monitor.

use chrono::{DateTime, Duration, Utc};

use super::policy::{CadencePolicy, Requirements};
use crate::domain::{GameState, MonitorKind};

/// Always due; runs at a slow fixed interval.
pub struct StatusChange {
    interval: Duration,
}

impl StatusChange {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl CadencePolicy for StatusChange {
    fn kind(&self) -> MonitorKind {
        MonitorKind::StatusChange
    }

    fn is_due(&self, _now: DateTime<Utc>, _state: &GameState) -> bool {
        true
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            bootstrap: true,
            ..Requirements::NONE
        }
    }
}
