//! Diffing fetched snapshots against committed state.
//!
//! Every function here takes the committed side and the fetched side as
//! plain arguments. First sightings are baselines: they are written but
//! produce no events, so a fresh database does not replay history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Counters, Event, EventContext, GameState, GameweekId, GameweekState, LiveStats, PlayerId,
    PlayerSnapshot, ScoringEngine, StatKey, StatLine,
};
use crate::error::DataIntegrityError;

/// How the bonus column of fetched rows is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusMode {
    /// Live data: keep the committed bonus, emit no bonus events.
    Preserve,
    /// Finalized data: diff and write the official bonus.
    Official,
}

/// Events and rows produced by a stat diff.
#[derive(Debug, Default)]
pub struct StatDiff {
    pub events: Vec<Event>,
    /// New or changed lines only.
    pub lines: Vec<StatLine>,
    pub skipped: Vec<DataIntegrityError>,
}

impl StatDiff {
    pub fn extend(&mut self, other: StatDiff) {
        self.events.extend(other.events);
        self.lines.extend(other.lines);
        self.skipped.extend(other.skipped);
    }
}

/// Price and status events for players seen before.
#[must_use]
pub fn diff_players(
    scoring: &ScoringEngine,
    committed: &HashMap<PlayerId, PlayerSnapshot>,
    fetched: &[PlayerSnapshot],
    gameweek: GameweekId,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    for player in fetched {
        let Some(previous) = committed.get(&player.id) else {
            continue;
        };
        let ctx = EventContext {
            player: player.id,
            gameweek,
            timestamp: now,
        };
        events.extend(scoring.score_price(previous, player, &ctx));
        events.extend(scoring.score_status(previous, player, &ctx));
    }
    events
}

/// Performance (and, for finalized data, bonus) events for fetched rows.
///
/// `players` supplies positions and teams; rows for unknown players, rows
/// with negative counters, and attributed rows whose fixture cannot be
/// resolved are skipped and reported.
#[must_use]
pub fn diff_stats(
    scoring: &ScoringEngine,
    players: &HashMap<PlayerId, PlayerSnapshot>,
    committed: &HashMap<StatKey, Counters>,
    rows: &[LiveStats],
    state: &GameState,
    mode: BonusMode,
    now: DateTime<Utc>,
) -> StatDiff {
    let mut diff = StatDiff::default();

    for row in rows {
        if let Err(e) = row.counters.validate() {
            diff.skipped
                .push(DataIntegrityError::new("live stats", row.player.get(), e.to_string()));
            continue;
        }
        let Some(player) = players.get(&row.player) else {
            diff.skipped
                .push(DataIntegrityError::new("live stats", row.player.get(), "unknown player"));
            continue;
        };
        let fixture = row
            .fixture
            .or_else(|| state.fixture_for(player.team, row.gameweek));
        let Some(fixture) = fixture else {
            // Blank gameweek for this player's team: nothing to attribute.
            if row.counters != Counters::default() {
                diff.skipped.push(DataIntegrityError::new(
                    "live stats",
                    row.player.get(),
                    format!("no fixture in gameweek {}", row.gameweek),
                ));
            }
            continue;
        };

        let key = StatKey {
            player: row.player,
            fixture,
            gameweek: row.gameweek,
        };
        let previous = committed.get(&key).copied();
        let ctx = EventContext {
            player: row.player,
            gameweek: row.gameweek,
            timestamp: now,
        };

        let stored = match mode {
            BonusMode::Preserve => row
                .counters
                .with_bonus_of(&previous.unwrap_or_default()),
            BonusMode::Official => row.counters,
        };

        if let Some(previous) = previous {
            diff.events.extend(scoring.score_performance(
                player.position,
                &previous,
                &row.counters,
                &ctx,
            ));
        }
        if mode == BonusMode::Official {
            let old_bonus = previous.map_or(0, |c| c.bonus);
            diff.events
                .extend(scoring.score_bonus(old_bonus, row.counters.bonus, &ctx));
        }

        if previous != Some(stored) {
            diff.lines.push(StatLine { key, counters: stored });
        }
    }

    diff
}

/// Overlay fetched gameweek flags on committed ones.
///
/// `processed` always comes from the committed row. A gameweek seen for the
/// first time already finalized is seeded as processed.
#[must_use]
pub fn merge_gameweeks(committed: &[GameweekState], fetched: &[GameweekState]) -> Vec<GameweekState> {
    let known: HashMap<GameweekId, bool> = committed.iter().map(|gw| (gw.id, gw.processed)).collect();
    fetched
        .iter()
        .map(|gw| {
            let processed = known
                .get(&gw.id)
                .copied()
                .unwrap_or(gw.finished && gw.data_checked);
            GameweekState {
                processed,
                ..gw.clone()
            }
        })
        .collect()
}
