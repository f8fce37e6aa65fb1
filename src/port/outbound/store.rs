//! Persistence ports for committed snapshots and the run log.
//!
//! Diffs are always computed against what these ports return, never against
//! anything held in memory across cycles. A commit is all-or-nothing: if it
//! fails, the next cycle re-diffs against the previous committed state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Counters, Event, FixtureState, GameweekId, GameweekState, MonitoringRun, PlayerId,
    PlayerSnapshot, StatKey, StatLine,
};
use crate::error::Result;

/// Everything one cycle wants to make durable.
#[derive(Debug, Clone, Default)]
pub struct CycleCommit {
    pub players: Vec<PlayerSnapshot>,
    pub fixtures: Vec<FixtureState>,
    /// Upserted without ever clearing an existing `processed` flag.
    pub gameweeks: Vec<GameweekState>,
    pub stat_lines: Vec<StatLine>,
    /// Gameweeks whose bonus this cycle claims to finalize.
    pub finalize: Vec<GameweekId>,
    /// Candidate events. Bonus events for a gameweek whose finalization
    /// loses the check-and-set are dropped.
    pub events: Vec<Event>,
    /// Whether the surviving events will be dispatched.
    pub dispatched: bool,
    /// Cycle instant, stamped on written rows.
    pub at: DateTime<Utc>,
    /// When set, the commit is refused unless this owner still holds the
    /// engine lock.
    pub lock_owner: Option<String>,
}

/// Result of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Events that passed the idempotency guard and were recorded.
    pub events: Vec<Event>,
    /// Gameweeks whose `processed` flag this commit flipped.
    pub finalized: Vec<GameweekId>,
}

/// Last committed provider state.
pub trait SnapshotStore: Send + Sync {
    fn load_players(&self) -> Result<HashMap<PlayerId, PlayerSnapshot>>;

    fn load_fixtures(&self) -> Result<Vec<FixtureState>>;

    fn load_gameweeks(&self) -> Result<Vec<GameweekState>>;

    /// Stat lines for the given gameweeks, keyed by (player, fixture, gameweek).
    fn load_stat_lines(&self, gameweeks: &[GameweekId]) -> Result<HashMap<StatKey, Counters>>;

    /// Apply a cycle's writes in one transaction.
    ///
    /// Fails with [`Error::LockLost`](crate::error::Error::LockLost) and
    /// writes nothing if [`CycleCommit::lock_owner`] no longer holds the lock.
    ///
    /// Finalization is a conditional update of the gameweek's `processed`
    /// flag from false to true; a gameweek that was already processed is
    /// left out of [`CommitOutcome::finalized`] and its bonus events are
    /// dropped.
    fn commit(&self, commit: CycleCommit) -> Result<CommitOutcome>;
}

/// Append-only record of cycles.
pub trait RunLog: Send + Sync {
    fn record_run(&self, run: &MonitoringRun) -> Result<()>;

    /// Most recent runs first.
    fn recent_runs(&self, limit: usize) -> Result<Vec<MonitoringRun>>;
}
