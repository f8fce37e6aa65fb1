//! Read-only classification of fixtures and gameweeks at an instant.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use super::fixture::{FixtureState, GameweekState};
use super::id::{FixtureId, GameweekId, TeamId};

/// What the engine knows about the competition at `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    now: DateTime<Utc>,
    fixtures: Vec<FixtureState>,
    gameweeks: Vec<GameweekState>,
}

impl GameState {
    #[must_use]
    pub fn new(now: DateTime<Utc>, fixtures: Vec<FixtureState>, gameweeks: Vec<GameweekState>) -> Self {
        Self {
            now,
            fixtures,
            gameweeks,
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn fixtures(&self) -> &[FixtureState] {
        &self.fixtures
    }

    #[must_use]
    pub fn gameweeks(&self) -> &[GameweekState] {
        &self.gameweeks
    }

    pub fn live_fixtures(&self) -> impl Iterator<Item = &FixtureState> {
        self.fixtures.iter().filter(|f| f.is_live())
    }

    /// Any match `started && !finished`.
    #[must_use]
    pub fn any_live(&self) -> bool {
        self.live_fixtures().next().is_some()
    }

    /// Gameweeks with at least one live fixture, ascending.
    #[must_use]
    pub fn live_gameweeks(&self) -> BTreeSet<GameweekId> {
        self.live_fixtures().filter_map(|f| f.gameweek).collect()
    }

    /// The provider's current gameweek, falling back to the most recent one
    /// with a live fixture, then the earliest unfinished one.
    #[must_use]
    pub fn current_gameweek(&self) -> Option<GameweekId> {
        self.gameweeks
            .iter()
            .find(|gw| gw.is_current)
            .map(|gw| gw.id)
            .or_else(|| self.live_gameweeks().into_iter().next_back())
            .or_else(|| {
                self.gameweeks
                    .iter()
                    .filter(|gw| !gw.finished)
                    .map(|gw| gw.id)
                    .min()
            })
    }

    /// Gameweeks finalized by the provider whose bonus has not been emitted.
    #[must_use]
    pub fn pending_bonus(&self) -> Vec<GameweekId> {
        self.gameweeks
            .iter()
            .filter(|gw| gw.awaiting_bonus())
            .map(|gw| gw.id)
            .collect()
    }

    /// Gameweeks the provider has finished but not yet data-checked.
    #[must_use]
    pub fn awaiting_data_check(&self) -> Vec<GameweekId> {
        self.gameweeks
            .iter()
            .filter(|gw| gw.finished && !gw.data_checked && !gw.processed)
            .map(|gw| gw.id)
            .collect()
    }

    #[must_use]
    pub fn gameweek(&self, id: GameweekId) -> Option<&GameweekState> {
        self.gameweeks.iter().find(|gw| gw.id == id)
    }

    /// Earliest kick-off still in the future and no further than `within`
    /// from now.
    #[must_use]
    pub fn upcoming_kickoff(&self, within: Duration) -> Option<DateTime<Utc>> {
        let horizon = self.now + within;
        self.fixtures
            .iter()
            .filter(|f| !f.started)
            .filter_map(|f| f.kickoff_time)
            .filter(|kickoff| *kickoff > self.now && *kickoff <= horizon)
            .min()
    }

    /// Whether a fixture's kick-off time has passed without the provider
    /// marking it started. Fixtures more than `grace` past kick-off are
    /// treated as postponed and ignored.
    #[must_use]
    pub fn awaiting_kickoff(&self, grace: Duration) -> bool {
        self.fixtures.iter().any(|f| {
            !f.started
                && !f.finished
                && f
                    .kickoff_time
                    .is_some_and(|kickoff| kickoff <= self.now && self.now - kickoff <= grace)
        })
    }

    /// The fixture `team` plays in `gameweek`.
    ///
    /// In a double gameweek the live fixture wins, then the earliest kick-off.
    #[must_use]
    pub fn fixture_for(&self, team: TeamId, gameweek: GameweekId) -> Option<FixtureId> {
        let mut candidates: Vec<&FixtureState> = self
            .fixtures
            .iter()
            .filter(|f| f.gameweek == Some(gameweek) && f.involves(team))
            .collect();
        candidates.sort_by_key(|f| (!f.is_live(), f.kickoff_time));
        candidates.first().map(|f| f.id)
    }
}
