//! Final bonus monitor.

use chrono::{DateTime, Duration, Utc};

use super::policy::{CadencePolicy, Requirements};
use crate::domain::{GameState, MonitorKind};

/// Due when a gameweek is `finished && data_checked && !processed`.
///
/// Also polls while a finished gameweek still waits for the provider's data
/// check, so finalization is noticed at this monitor's interval rather than
/// at the next unrelated metadata fetch. Only gameweeks that are actually
/// data-checked are ever finalized.
pub struct FinalBonus {
    interval: Duration,
}

impl FinalBonus {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl CadencePolicy for FinalBonus {
    fn kind(&self) -> MonitorKind {
        MonitorKind::FinalBonus
    }

    fn is_due(&self, _now: DateTime<Utc>, state: &GameState) -> bool {
        !state.pending_bonus().is_empty() || !state.awaiting_data_check().is_empty()
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            bootstrap: true,
            live: true,
            ..Requirements::NONE
        }
    }
}
