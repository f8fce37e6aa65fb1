//! In-process persistence for tests.
//!
//! `MemoryStore` implements [`SnapshotStore`], [`RunLog`] and [`EngineLock`]
//! with the same semantics as the SQLite adapter: gameweek upserts never
//! clear `processed`, finalization is a check-and-set, and bonus events
//! for a gameweek that loses the check-and-set are dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Counters, Event, EventKind, FixtureId, FixtureState, GameweekId, GameweekState,
    MonitoringRun, PlayerId, PlayerSnapshot, StatKey,
};
use crate::error::{Error, Result};
use crate::port::{CommitOutcome, CycleCommit, EngineLock, RunLog, SnapshotStore};

/// An event as written to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event: Event,
    pub dispatched: bool,
}

#[derive(Default)]
struct Tables {
    players: HashMap<PlayerId, PlayerSnapshot>,
    fixtures: HashMap<FixtureId, FixtureState>,
    gameweeks: HashMap<GameweekId, GameweekState>,
    stat_lines: HashMap<StatKey, Counters>,
    events: Vec<RecordedEvent>,
    runs: Vec<MonitoringRun>,
    lock: Option<(String, DateTime<Utc>)>,
    commits: u32,
    fail_commits: bool,
}

/// Shared, clonable in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent commit fail with a database error.
    pub fn fail_commits(&self, fail: bool) {
        self.tables.lock().expect("lock tables").fail_commits = fail;
    }

    /// Seed a gameweek row directly.
    pub fn put_gameweek(&self, gameweek: GameweekState) {
        self.tables
            .lock()
            .expect("lock tables")
            .gameweeks
            .insert(gameweek.id, gameweek);
    }

    /// Seed a fixture row directly.
    pub fn put_fixture(&self, fixture: FixtureState) {
        self.tables
            .lock()
            .expect("lock tables")
            .fixtures
            .insert(fixture.id, fixture);
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.tables.lock().expect("lock tables").events.clone()
    }

    /// Number of successful commits.
    pub fn commits(&self) -> u32 {
        self.tables.lock().expect("lock tables").commits
    }

    pub fn gameweek(&self, id: u32) -> Option<GameweekState> {
        self.tables
            .lock()
            .expect("lock tables")
            .gameweeks
            .get(&GameweekId::new(id))
            .cloned()
    }

    pub fn lock_holder(&self) -> Option<String> {
        self.tables
            .lock()
            .expect("lock tables")
            .lock
            .as_ref()
            .map(|(owner, _)| owner.clone())
    }
}

impl SnapshotStore for MemoryStore {
    fn load_players(&self) -> Result<HashMap<PlayerId, PlayerSnapshot>> {
        Ok(self.tables.lock().expect("lock tables").players.clone())
    }

    fn load_fixtures(&self) -> Result<Vec<FixtureState>> {
        let tables = self.tables.lock().expect("lock tables");
        let mut fixtures: Vec<FixtureState> = tables.fixtures.values().cloned().collect();
        fixtures.sort_by_key(|f| f.id);
        Ok(fixtures)
    }

    fn load_gameweeks(&self) -> Result<Vec<GameweekState>> {
        let tables = self.tables.lock().expect("lock tables");
        let mut gameweeks: Vec<GameweekState> = tables.gameweeks.values().cloned().collect();
        gameweeks.sort_by_key(|gw| gw.id);
        Ok(gameweeks)
    }

    fn load_stat_lines(&self, gameweeks: &[GameweekId]) -> Result<HashMap<StatKey, Counters>> {
        let tables = self.tables.lock().expect("lock tables");
        Ok(tables
            .stat_lines
            .iter()
            .filter(|(key, _)| gameweeks.contains(&key.gameweek))
            .map(|(key, counters)| (*key, *counters))
            .collect())
    }

    fn commit(&self, commit: CycleCommit) -> Result<CommitOutcome> {
        let mut tables = self.tables.lock().expect("lock tables");
        if tables.fail_commits {
            return Err(Error::Database("injected commit failure".into()));
        }
        if let Some(owner) = &commit.lock_owner {
            let holder = tables.lock.as_ref().map(|(holder, _)| holder.clone());
            if holder.as_deref() != Some(owner.as_str()) {
                return Err(Error::LockLost(holder.unwrap_or_default()));
            }
        }

        for player in commit.players {
            tables.players.insert(player.id, player);
        }
        for fixture in commit.fixtures {
            tables.fixtures.insert(fixture.id, fixture);
        }
        for mut gameweek in commit.gameweeks {
            if let Some(existing) = tables.gameweeks.get(&gameweek.id) {
                gameweek.processed |= existing.processed;
            }
            tables.gameweeks.insert(gameweek.id, gameweek);
        }
        for line in commit.stat_lines {
            tables.stat_lines.insert(line.key, line.counters);
        }

        let mut finalized = Vec::new();
        let mut lost = Vec::new();
        for id in commit.finalize {
            match tables.gameweeks.get_mut(&id) {
                Some(gameweek) if !gameweek.processed => {
                    gameweek.processed = true;
                    finalized.push(id);
                }
                _ => lost.push(id),
            }
        }

        let events: Vec<Event> = commit
            .events
            .into_iter()
            .filter(|e| !(e.kind == EventKind::Bonus && lost.contains(&e.gameweek)))
            .collect();
        tables.events.extend(events.iter().map(|event| RecordedEvent {
            event: event.clone(),
            dispatched: commit.dispatched,
        }));
        tables.commits += 1;

        Ok(CommitOutcome { events, finalized })
    }
}

impl RunLog for MemoryStore {
    fn record_run(&self, run: &MonitoringRun) -> Result<()> {
        self.tables.lock().expect("lock tables").runs.push(run.clone());
        Ok(())
    }

    fn recent_runs(&self, limit: usize) -> Result<Vec<MonitoringRun>> {
        let tables = self.tables.lock().expect("lock tables");
        Ok(tables.runs.iter().rev().take(limit).cloned().collect())
    }
}

impl EngineLock for MemoryStore {
    fn try_acquire(&self, owner: &str, now: DateTime<Utc>, ttl: Duration) -> Result<bool> {
        let mut tables = self.tables.lock().expect("lock tables");
        let free = match &tables.lock {
            None => true,
            Some((holder, heartbeat)) => holder == owner || now - *heartbeat >= ttl,
        };
        if free {
            tables.lock = Some((owner.to_string(), now));
        }
        Ok(free)
    }

    fn release(&self, owner: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock tables");
        if tables.lock.as_ref().is_some_and(|(holder, _)| holder == owner) {
            tables.lock = None;
        }
        Ok(())
    }
}
