//! Monitor intervals and scheduler timing.

use chrono::Duration;
use serde::Deserialize;

use crate::application::cadence::CadenceIntervals;
use crate::application::SchedulerTiming;

/// `[cadence]` section, all values in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CadenceConfig {
    #[serde(default = "default_live_secs")]
    pub live_secs: u64,
    #[serde(default = "default_price_secs")]
    pub price_secs: u64,
    #[serde(default = "default_bonus_secs")]
    pub bonus_secs: u64,
    #[serde(default = "default_status_secs")]
    pub status_secs: u64,
    /// Sleep when no monitor is active.
    #[serde(default = "default_idle_secs")]
    pub idle_secs: u64,
    /// Maximum age of the fixture list.
    #[serde(default = "default_fixture_refresh_secs")]
    pub fixture_refresh_secs: u64,
    /// Wake this long before a kick-off.
    #[serde(default = "default_kickoff_lead_secs")]
    pub kickoff_lead_secs: u64,
}

const fn default_live_secs() -> u64 {
    60
}

const fn default_price_secs() -> u64 {
    300
}

const fn default_bonus_secs() -> u64 {
    300
}

const fn default_status_secs() -> u64 {
    3600
}

const fn default_idle_secs() -> u64 {
    3600
}

const fn default_fixture_refresh_secs() -> u64 {
    900
}

const fn default_kickoff_lead_secs() -> u64 {
    120
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            live_secs: default_live_secs(),
            price_secs: default_price_secs(),
            bonus_secs: default_bonus_secs(),
            status_secs: default_status_secs(),
            idle_secs: default_idle_secs(),
            fixture_refresh_secs: default_fixture_refresh_secs(),
            kickoff_lead_secs: default_kickoff_lead_secs(),
        }
    }
}

pub(crate) fn seconds(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
}

impl CadenceConfig {
    /// Fields that must be non-zero, by name.
    pub(crate) fn intervals_by_name(&self) -> [(&'static str, u64); 6] {
        [
            ("cadence.live_secs", self.live_secs),
            ("cadence.price_secs", self.price_secs),
            ("cadence.bonus_secs", self.bonus_secs),
            ("cadence.status_secs", self.status_secs),
            ("cadence.idle_secs", self.idle_secs),
            ("cadence.fixture_refresh_secs", self.fixture_refresh_secs),
        ]
    }

    #[must_use]
    pub fn intervals(&self) -> CadenceIntervals {
        CadenceIntervals {
            live: seconds(self.live_secs),
            price: seconds(self.price_secs),
            bonus: seconds(self.bonus_secs),
            status: seconds(self.status_secs),
        }
    }

    #[must_use]
    pub fn timing(&self) -> SchedulerTiming {
        SchedulerTiming {
            idle: seconds(self.idle_secs),
            fixture_refresh: seconds(self.fixture_refresh_secs),
            kickoff_lead: seconds(self.kickoff_lead_secs),
            ..SchedulerTiming::default()
        }
    }
}
