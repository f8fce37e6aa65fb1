//! Restarts against a real SQLite database never replay events.

mod harness;
mod support;

use std::sync::Arc;

use fplwatch::adapter::outbound::sqlite::{SqliteRunLog, SqliteSnapshotStore};
use fplwatch::application::Scheduler;
use fplwatch::domain::{GameweekId, RunKind, RunStatus};
use fplwatch::infrastructure::bootstrap::assemble;
use fplwatch::port::{RunLog, SnapshotStore};
use fplwatch::testkit::clock::ManualClock;
use fplwatch::testkit::fetcher::ScriptedFetcher;

use harness::temp_db::TempDb;
use support::engine::{manual_clock, test_config};
use support::matchday::{quiet, script_full_time, script_live, scored, with_bonus, GAMEWEEK};

fn boot(db: &TempDb, fetcher: &ScriptedFetcher, clock: &Arc<ManualClock>) -> Scheduler {
    assemble(
        &test_config(),
        db.pool().clone(),
        Arc::new(fetcher.clone()),
        clock.clone(),
    )
    .expect("assemble scheduler")
}

#[tokio::test]
async fn restart_does_not_replay_live_events() {
    let db = TempDb::create("restart-live");
    let fetcher = ScriptedFetcher::new();
    let clock = manual_clock();
    let (striker, keeper) = quiet();
    script_live(&fetcher, striker, keeper);

    let mut scheduler = boot(&db, &fetcher, &clock);
    scheduler.tick(RunKind::Monitor).await;
    script_live(&fetcher, scored(35, 1), keeper);
    clock.advance(chrono::Duration::seconds(60));
    let run = scheduler.tick(RunKind::Monitor).await;
    assert_eq!(run.changes_detected, 1);
    drop(scheduler);

    let mut scheduler = boot(&db, &fetcher, &clock);
    clock.advance(chrono::Duration::seconds(60));
    let run = scheduler.tick(RunKind::Monitor).await;

    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.changes_detected, 0);

    let events = SqliteSnapshotStore::new(db.pool().clone())
        .recent_events(10)
        .expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "goal");
    assert_eq!(events[0].dispatched, 1);
}

#[tokio::test]
async fn restart_after_finalization_does_not_repeat_bonus() {
    let db = TempDb::create("restart-bonus");
    let fetcher = ScriptedFetcher::new();
    let clock = manual_clock();
    let (striker, keeper) = quiet();
    script_live(&fetcher, striker, keeper);

    let mut scheduler = boot(&db, &fetcher, &clock);
    scheduler.tick(RunKind::Monitor).await;
    script_full_time(&fetcher, with_bonus(scored(90, 0), 2), scored(90, 0));
    clock.advance(chrono::Duration::seconds(3600));
    scheduler.tick(RunKind::Monitor).await;
    clock.advance(chrono::Duration::seconds(300));
    scheduler.tick(RunKind::Monitor).await;
    drop(scheduler);

    let store = SqliteSnapshotStore::new(db.pool().clone());
    let gameweeks = store.load_gameweeks().expect("gameweeks");
    let gameweek = gameweeks
        .iter()
        .find(|gw| gw.id == GameweekId::new(GAMEWEEK))
        .expect("gameweek stored");
    assert!(gameweek.processed);

    let mut scheduler = boot(&db, &fetcher, &clock);
    clock.advance(chrono::Duration::seconds(300));
    scheduler.tick(RunKind::Monitor).await;
    clock.advance(chrono::Duration::seconds(3600));
    scheduler.tick(RunKind::Monitor).await;

    let bonus = store
        .recent_events(50)
        .expect("events")
        .into_iter()
        .filter(|e| e.kind == "bonus")
        .count();
    assert_eq!(bonus, 1);
}

#[tokio::test]
async fn every_tick_is_recorded_in_the_run_log() {
    let db = TempDb::create("run-log");
    let fetcher = ScriptedFetcher::new();
    let clock = manual_clock();
    let (striker, keeper) = quiet();
    script_live(&fetcher, striker, keeper);

    let mut scheduler = boot(&db, &fetcher, &clock);
    scheduler.tick(RunKind::Monitor).await;
    fetcher.fail_fixtures(true);
    clock.advance(chrono::Duration::seconds(60));
    scheduler.tick(RunKind::Refresh).await;

    let runs = SqliteRunLog::new(db.pool().clone())
        .recent_runs(10)
        .expect("runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].kind, RunKind::Refresh);
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert!(runs[0].error_message.is_some());
    assert_eq!(runs[1].status, RunStatus::Success);
    assert_eq!(runs[1].service_name, "fplwatch-test");
    assert!(db.path().exists());
}
