//! The cadence policy contract.

use std::ops::BitOr;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Event, GameState, MonitorKind};

/// Provider resources a monitor needs fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    pub bootstrap: bool,
    pub fixtures: bool,
    pub live: bool,
}

impl Requirements {
    pub const NONE: Self = Self {
        bootstrap: false,
        fixtures: false,
        live: false,
    };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.bootstrap && !self.fixtures && !self.live
    }
}

impl BitOr for Requirements {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bootstrap: self.bootstrap || rhs.bootstrap,
            fixtures: self.fixtures || rhs.fixtures,
            live: self.live || rhs.live,
        }
    }
}

/// A monitor: a pure due predicate plus the interval it runs at while due.
///
/// Policies are evaluated independently every tick; several can be due at
/// once.
pub trait CadencePolicy: Send + Sync {
    fn kind(&self) -> MonitorKind;

    /// Whether the monitor wants to run at `now`, ignoring its interval.
    fn is_due(&self, now: DateTime<Utc>, state: &GameState) -> bool;

    /// Minimum spacing between runs while due.
    fn interval(&self) -> Duration;

    fn requirements(&self) -> Requirements;

    /// The next instant this monitor becomes due, when it is not due now and
    /// that instant is known in advance.
    fn next_opening(&self, _now: DateTime<Utc>, _state: &GameState) -> Option<DateTime<Utc>> {
        None
    }

    /// Feedback after a cycle this monitor took part in committed.
    fn observe(&self, _now: DateTime<Utc>, _events: &[Event]) {}
}
