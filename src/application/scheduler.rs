//! The main loop: evaluate monitors, run a cycle, sleep until the next one.
//!
//! A single logical worker. Cycles never overlap, and shutdown is only
//! observed between cycles so a commit is never interrupted. While it holds
//! the engine lock the scheduler renews the lease during long sleeps, and
//! every commit is fenced on still holding it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::cadence::CadenceRegistry;
use super::cycle::{CycleEngine, CycleInput, CycleReport};
use super::state::GameStateProvider;
use crate::domain::{GameState, MonitorKind, MonitoringRun, RunKind, RunStatus};
use crate::error::Result;
use crate::port::{Clock, EngineLock, RunLog, SnapshotStore};

/// Timing knobs that are not per-monitor intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Sleep when no monitor has a known next run.
    pub idle: Duration,
    /// Maximum age of the committed fixture list.
    pub fixture_refresh: Duration,
    /// Wake this long before a kick-off.
    pub kickoff_lead: Duration,
    /// Kick-offs further away than this do not shorten the sleep.
    pub kickoff_horizon: Duration,
    /// Shortest kick-off related sleep.
    pub min_sleep: Duration,
    /// A fixture this long past kick-off but not started counts as postponed.
    pub kickoff_grace: Duration,
    /// Sleep floor after a failed cycle.
    pub failure_backoff: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            idle: Duration::seconds(3600),
            fixture_refresh: Duration::seconds(900),
            kickoff_lead: Duration::seconds(120),
            kickoff_horizon: Duration::minutes(30),
            min_sleep: Duration::seconds(60),
            kickoff_grace: Duration::hours(3),
            failure_backoff: Duration::seconds(60),
        }
    }
}

/// Identity and lease settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub service_name: String,
    pub lock_owner: String,
    pub lock_ttl: Duration,
    pub timing: SchedulerTiming,
}

/// Durable collaborators the scheduler needs beyond the cycle engine.
pub struct SchedulerPorts {
    pub store: Arc<dyn SnapshotStore>,
    pub runs: Arc<dyn RunLog>,
    pub lock: Arc<dyn EngineLock>,
    pub clock: Arc<dyn Clock>,
}

/// Drives cycles according to the cadence registry.
pub struct Scheduler {
    engine: CycleEngine,
    registry: CadenceRegistry,
    provider: GameStateProvider,
    runs: Arc<dyn RunLog>,
    lock: Arc<dyn EngineLock>,
    clock: Arc<dyn Clock>,
    settings: SchedulerSettings,
    last_runs: HashMap<MonitorKind, DateTime<Utc>>,
    last_fixture_refresh: Option<DateTime<Utc>>,
    holding: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        engine: CycleEngine,
        registry: CadenceRegistry,
        ports: SchedulerPorts,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            engine,
            registry,
            provider: GameStateProvider::new(ports.store),
            runs: ports.runs,
            lock: ports.lock,
            clock: ports.clock,
            settings,
            last_runs: HashMap::new(),
            last_fixture_refresh: None,
            holding: false,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CadenceRegistry {
        &self.registry
    }

    /// Run one cycle and record it in the run log.
    pub async fn tick(&mut self, kind: RunKind) -> MonitoringRun {
        let started_at = self.clock.now();
        let mut monitors = Vec::new();
        let result = self.try_tick(kind, started_at, &mut monitors).await;
        let finished_at = self.clock.now();

        let mut run = MonitoringRun {
            service_name: self.settings.service_name.clone(),
            kind,
            monitors,
            status: RunStatus::Success,
            started_at,
            finished_at,
            records_processed: 0,
            changes_detected: 0,
            notifications_sent: 0,
            error_message: None,
        };

        match result {
            Ok(Some(report)) => {
                run.records_processed = report.records_processed;
                run.changes_detected = report.changes_detected;
                run.notifications_sent = report.notifications_sent;
            }
            Ok(None) => {
                run.status = RunStatus::Standby;
                info!(owner = %self.settings.lock_owner, "Engine lock held elsewhere, standing by");
            }
            Err(e) => {
                run.status = RunStatus::Failed;
                run.error_message = Some(e.to_string());
                if e.is_persistence() {
                    error!(error = %e, "Cycle failed to persist; committed state unchanged");
                } else {
                    warn!(error = %e, "Cycle failed; will retry on next schedule");
                }
            }
        }

        if let Err(e) = self.runs.record_run(&run) {
            warn!(error = %e, "Failed to record monitoring run");
        }
        run
    }

    /// Returns `None` when another instance holds the lock.
    async fn try_tick(
        &mut self,
        kind: RunKind,
        now: DateTime<Utc>,
        monitors: &mut Vec<MonitorKind>,
    ) -> Result<Option<CycleReport>> {
        self.holding = false;
        if !self
            .lock
            .try_acquire(&self.settings.lock_owner, now, self.settings.lock_ttl)?
        {
            return Ok(None);
        }
        self.holding = true;

        let state = self.provider.current(now)?;
        *monitors = self.due_monitors(now, &state);

        let wants_fixtures = self.registry.requirements(monitors.as_slice()).fixtures;
        let (state, fixtures) = if wants_fixtures || self.fixtures_stale(now, &state) {
            match self.engine.fetch_fixtures().await {
                Ok(fixtures) => {
                    self.last_fixture_refresh = Some(now);
                    let state = GameState::new(now, fixtures.clone(), state.gameweeks().to_vec());
                    (state, Some(fixtures))
                }
                Err(e) => {
                    self.mark_ran(monitors, now);
                    return Err(e);
                }
            }
        } else {
            (state, None)
        };

        *monitors = self.due_monitors(now, &state);
        let due = monitors.clone();
        self.mark_ran(&due, now);

        if due.is_empty() && fixtures.is_none() {
            debug!("No monitor due");
            return Ok(Some(CycleReport::default()));
        }

        let input = CycleInput {
            kind,
            now,
            requirements: self.registry.requirements(&due),
            monitors: due.clone(),
            state,
            fixtures,
            lock_owner: Some(self.settings.lock_owner.clone()),
        };
        let report = self.engine.execute(input).await?;
        self.registry.observe(&due, now, &report.events);
        Ok(Some(report))
    }

    /// Monitors whose predicate holds and whose interval has elapsed.
    #[must_use]
    pub fn due_monitors(&self, now: DateTime<Utc>, state: &GameState) -> Vec<MonitorKind> {
        self.registry
            .due(now, state)
            .filter(|policy| {
                self.last_runs
                    .get(&policy.kind())
                    .map_or(true, |last| now - *last >= policy.interval())
            })
            .map(|policy| policy.kind())
            .collect()
    }

    fn fixtures_stale(&self, now: DateTime<Utc>, state: &GameState) -> bool {
        let aged = self
            .last_fixture_refresh
            .map_or(true, |last| now - last >= self.settings.timing.fixture_refresh);
        aged || state.any_live() || state.awaiting_kickoff(self.settings.timing.kickoff_grace)
    }

    fn mark_ran(&mut self, monitors: &[MonitorKind], now: DateTime<Utc>) {
        for kind in monitors {
            self.last_runs.insert(*kind, now);
        }
    }

    /// How long to sleep from `now` given committed state.
    #[must_use]
    pub fn next_sleep(&self, now: DateTime<Utc>, state: &GameState) -> Duration {
        let timing = &self.settings.timing;
        let mut wake = now + timing.idle;

        for policy in self.registry.policies() {
            let candidate = if policy.is_due(now, state) {
                Some(
                    self.last_runs
                        .get(&policy.kind())
                        .map_or(now, |last| *last + policy.interval()),
                )
            } else {
                policy.next_opening(now, state)
            };
            if let Some(candidate) = candidate {
                wake = wake.min(candidate);
            }
        }

        if let Some(kickoff) = state.upcoming_kickoff(timing.kickoff_horizon) {
            wake = wake.min((kickoff - timing.kickoff_lead).max(now + timing.min_sleep));
        }
        if state.awaiting_kickoff(timing.kickoff_grace) {
            wake = wake.min(now + timing.min_sleep);
        }

        (wake - now).max(Duration::seconds(1))
    }

    fn plan_sleep(&self, run: &MonitoringRun) -> Duration {
        let now = self.clock.now();
        let timing = &self.settings.timing;
        let planned = match self.provider.current(now) {
            Ok(state) => self.next_sleep(now, &state),
            Err(e) => {
                warn!(error = %e, "Could not read state for sleep planning");
                timing.failure_backoff
            }
        };
        match run.status {
            RunStatus::Failed => planned.max(timing.failure_backoff),
            RunStatus::Standby => planned.min(self.settings.lock_ttl),
            RunStatus::Success => planned,
        }
    }

    /// How often a held lease is renewed while sleeping.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        (self.settings.lock_ttl / 3).max(Duration::seconds(1))
    }

    /// Refresh the lease heartbeat if this instance holds the lock.
    ///
    /// Returns whether the lock is still held.
    ///
    /// # Errors
    /// Propagates lock store failures.
    pub fn renew_lease(&mut self) -> Result<bool> {
        if !self.holding {
            return Ok(false);
        }
        let held = self.lock.try_acquire(
            &self.settings.lock_owner,
            self.clock.now(),
            self.settings.lock_ttl,
        )?;
        if !held {
            warn!(owner = %self.settings.lock_owner, "Engine lock taken over while sleeping");
        }
        self.holding = held;
        Ok(held)
    }

    /// Sleep for `total`, renewing the lease every heartbeat interval.
    ///
    /// Returns `false` if shutdown was requested.
    async fn sleep_holding(
        &mut self,
        total: Duration,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        let one_second = StdDuration::from_secs(1);
        let deadline = tokio::time::Instant::now() + total.to_std().unwrap_or(one_second);
        let heartbeat = self.heartbeat_interval().to_std().unwrap_or(one_second);

        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return true;
            }
            let remaining = deadline - now;
            let step = if self.holding {
                heartbeat.min(remaining)
            } else {
                remaining
            };
            tokio::select! {
                () = tokio::time::sleep(step) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return false;
                    }
                }
            }
            if self.holding && tokio::time::Instant::now() < deadline {
                if let Err(e) = self.renew_lease() {
                    warn!(error = %e, "Failed to renew engine lock");
                }
            }
        }
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    ///
    /// # Errors
    /// Cycle failures are recorded and retried; this only returns an error
    /// if releasing the lock fails on the way out.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            service = %self.settings.service_name,
            monitors = self.registry.len(),
            "Scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let run = self.tick(RunKind::Monitor).await;
            let sleep = self.plan_sleep(&run);
            debug!(seconds = sleep.num_seconds(), status = %run.status, "Sleeping until next due monitor");

            if !self.sleep_holding(sleep, &mut shutdown).await {
                break;
            }
        }

        info!("Scheduler stopping");
        self.lock.release(&self.settings.lock_owner)
    }

    /// Give up the engine lock.
    pub fn release(&self) -> Result<()> {
        self.lock.release(&self.settings.lock_owner)
    }

    /// Flush queued notifications before exit.
    ///
    /// Returns `false` if `limit` elapsed with deliveries still pending.
    pub async fn close_notifiers(&self, limit: StdDuration) -> bool {
        self.engine.close_notifiers(limit).await
    }
}
