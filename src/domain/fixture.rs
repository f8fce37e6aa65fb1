//! Fixtures and gameweeks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{FixtureId, GameweekId, TeamId};

/// Last observed state of one fixture.
///
/// Fixtures classify game state; they are never diffed for events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureState {
    pub id: FixtureId,
    /// `None` for postponed fixtures not yet rescheduled into a gameweek.
    pub gameweek: Option<GameweekId>,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub kickoff_time: Option<DateTime<Utc>>,
    pub started: bool,
    pub finished: bool,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub minutes: i32,
}

impl FixtureState {
    /// A match is live between kick-off and the provider's `finished` flag.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.started && !self.finished
    }

    /// True when `team` plays in this fixture.
    #[must_use]
    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Per-gameweek lifecycle flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameweekState {
    pub id: GameweekId,
    pub name: String,
    pub is_current: bool,
    pub finished: bool,
    /// Provider's own "official data is final" signal.
    pub data_checked: bool,
    /// Set once this engine has emitted final bonus for the gameweek.
    pub processed: bool,
}

impl GameweekState {
    /// Finalized by the provider but bonus not yet emitted.
    #[must_use]
    pub fn awaiting_bonus(&self) -> bool {
        self.finished && self.data_checked && !self.processed
    }
}
