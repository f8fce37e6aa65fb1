//! One unit of work: fetch, diff, persist, dispatch.
//!
//! A cycle either commits everything it computed or nothing. Any fetch or
//! persistence error aborts it before the commit, so the next cycle diffs
//! against the same committed state again.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::cadence::Requirements;
use super::diff::{diff_players, diff_stats, merge_gameweeks, BonusMode, StatDiff};
use crate::domain::{
    Event, FixtureState, GameState, GameweekId, GameweekState, MonitorKind, PlayerId,
    PlayerSnapshot, RunKind, ScoringEngine,
};
use crate::error::Result;
use crate::port::{Bootstrap, CycleCommit, DataFetcher, NotifierRegistry, SnapshotStore};

/// Gameweek attached to metadata events before the season has one.
const PRESEASON_GAMEWEEK: GameweekId = GameweekId::new(0);

/// What the scheduler decided for this cycle.
#[derive(Debug, Clone)]
pub struct CycleInput {
    pub kind: RunKind,
    pub now: DateTime<Utc>,
    pub monitors: Vec<MonitorKind>,
    pub requirements: Requirements,
    /// Game state, with the fixture list already refreshed if it was fetched.
    pub state: GameState,
    /// Freshly fetched fixtures to commit.
    pub fixtures: Option<Vec<FixtureState>>,
    /// Lock holder the commit is fenced on.
    pub lock_owner: Option<String>,
}

/// Counts and events of a committed cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub records_processed: u32,
    pub changes_detected: u32,
    pub notifications_sent: u32,
    pub events: Vec<Event>,
    pub finalized: Vec<GameweekId>,
}

/// Executes cycles against the provider and the store.
pub struct CycleEngine {
    fetcher: Arc<dyn DataFetcher>,
    store: Arc<dyn SnapshotStore>,
    notifiers: Arc<NotifierRegistry>,
    scoring: ScoringEngine,
}

impl CycleEngine {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn DataFetcher>,
        store: Arc<dyn SnapshotStore>,
        notifiers: Arc<NotifierRegistry>,
        scoring: ScoringEngine,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifiers,
            scoring,
        }
    }

    /// Close the notifiers, waiting at most `limit` for queued deliveries.
    pub async fn close_notifiers(&self, limit: std::time::Duration) -> bool {
        self.notifiers.close_all(limit).await
    }

    /// Fetch the fixture list.
    pub async fn fetch_fixtures(&self) -> Result<Vec<FixtureState>> {
        Ok(self.fetcher.fetch_fixtures().await?)
    }

    /// Run one cycle.
    ///
    /// # Errors
    /// Returns the first fetch or persistence error; nothing is committed or
    /// dispatched in that case.
    pub async fn execute(&self, input: CycleInput) -> Result<CycleReport> {
        let CycleInput {
            kind,
            now,
            monitors,
            requirements,
            mut state,
            fixtures,
            lock_owner,
        } = input;

        let committed_players = self.store.load_players()?;
        let need_bootstrap =
            requirements.bootstrap || (requirements.live && committed_players.is_empty());

        let mut bootstrap = if need_bootstrap {
            Some(self.fetcher.fetch_bootstrap().await?)
        } else {
            None
        };

        let mut gameweeks = Vec::new();
        let mut players = committed_players.clone();
        if let Some(bootstrap) = &bootstrap {
            absorb_bootstrap(bootstrap, now, &mut state, &mut gameweeks, &mut players);
        }

        let mut plan: BTreeMap<GameweekId, BonusMode> = BTreeMap::new();
        if monitors.contains(&MonitorKind::LivePerformance) {
            for gameweek in state.live_gameweeks() {
                plan.insert(gameweek, BonusMode::Preserve);
            }
        }
        if monitors.contains(&MonitorKind::FinalBonus) {
            for gameweek in state.pending_bonus() {
                plan.insert(gameweek, BonusMode::Official);
            }
        }

        let mut fetched = Vec::with_capacity(plan.len());
        for (&gameweek, &mode) in &plan {
            let rows = self.fetcher.fetch_live(gameweek).await?;
            debug!(gameweek = %gameweek, rows = rows.len(), ?mode, "Fetched live stats");
            fetched.push((mode, rows));
        }

        let unknown = fetched
            .iter()
            .flat_map(|(_, rows)| rows)
            .filter(|row| !players.contains_key(&row.player))
            .count();
        if bootstrap.is_none() && unknown > 0 {
            debug!(unknown, "Live stats reference players not yet stored, refreshing roster");
            let fresh = self.fetcher.fetch_bootstrap().await?;
            absorb_bootstrap(&fresh, now, &mut state, &mut gameweeks, &mut players);
            bootstrap = Some(fresh);
        }

        let gameweek_ids: Vec<GameweekId> = plan.keys().copied().collect();
        let committed_lines = if gameweek_ids.is_empty() {
            HashMap::new()
        } else {
            self.store.load_stat_lines(&gameweek_ids)?
        };

        let mut events = Vec::new();
        if let Some(bootstrap) = &bootstrap {
            let gameweek = state.current_gameweek().unwrap_or(PRESEASON_GAMEWEEK);
            events.extend(diff_players(
                &self.scoring,
                &committed_players,
                &bootstrap.players,
                gameweek,
                now,
            ));
        }

        let mut stats = StatDiff::default();
        for (mode, rows) in &fetched {
            stats.extend(diff_stats(
                &self.scoring,
                &players,
                &committed_lines,
                rows,
                &state,
                *mode,
                now,
            ));
        }
        for skipped in &stats.skipped {
            warn!(entity = skipped.entity, id = skipped.id, reason = %skipped.reason, "Skipping malformed entity");
        }
        events.extend(stats.events);

        let finalize: Vec<GameweekId> = plan
            .iter()
            .filter(|(_, mode)| **mode == BonusMode::Official)
            .map(|(gameweek, _)| *gameweek)
            .collect();

        let live_rows: usize = fetched.iter().map(|(_, rows)| rows.len()).sum();
        let fixture_rows = fixtures.as_ref().map_or(0, Vec::len);
        let player_rows = bootstrap.as_ref().map_or(0, |b| b.players.len());
        let records = live_rows + fixture_rows + player_rows;

        let commit = CycleCommit {
            players: bootstrap.map(|b| b.players).unwrap_or_default(),
            fixtures: fixtures.unwrap_or_default(),
            gameweeks,
            stat_lines: stats.lines,
            finalize,
            events,
            dispatched: kind.dispatches(),
            at: now,
            lock_owner,
        };
        let outcome = self.store.commit(commit)?;

        for gameweek in &outcome.finalized {
            info!(gameweek = %gameweek, "Final bonus processed");
        }

        let sent = if kind.dispatches() && !self.notifiers.is_empty() {
            for event in &outcome.events {
                self.notifiers.notify_all(event);
            }
            outcome.events.len()
        } else {
            0
        };

        info!(
            kind = %kind,
            records,
            events = outcome.events.len(),
            sent,
            "Cycle committed"
        );

        Ok(CycleReport {
            records_processed: saturate(records),
            changes_detected: saturate(outcome.events.len()),
            notifications_sent: saturate(sent),
            events: outcome.events,
            finalized: outcome.finalized,
        })
    }
}

fn absorb_bootstrap(
    bootstrap: &Bootstrap,
    now: DateTime<Utc>,
    state: &mut GameState,
    gameweeks: &mut Vec<GameweekState>,
    players: &mut HashMap<PlayerId, PlayerSnapshot>,
) {
    for skipped in &bootstrap.skipped {
        warn!(entity = skipped.entity, id = skipped.id, reason = %skipped.reason, "Skipping malformed entity");
    }
    *gameweeks = merge_gameweeks(state.gameweeks(), &bootstrap.gameweeks);
    *state = GameState::new(now, state.fixtures().to_vec(), gameweeks.clone());
    players.extend(bootstrap.players.iter().map(|p| (p.id, p.clone())));
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
