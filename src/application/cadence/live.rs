//! Live match performance monitor.

use chrono::{DateTime, Duration, Utc};

use super::policy::{CadencePolicy, Requirements};
use crate::domain::{GameState, MonitorKind};

/// Due while any fixture is `started && !finished`.
pub struct LivePerformance {
    interval: Duration,
}

impl LivePerformance {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl CadencePolicy for LivePerformance {
    fn kind(&self) -> MonitorKind {
        MonitorKind::LivePerformance
    }

    fn is_due(&self, _now: DateTime<Utc>, state: &GameState) -> bool {
        state.any_live()
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            fixtures: true,
            live: true,
            ..Requirements::NONE
        }
    }
}
