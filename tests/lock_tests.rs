//! Single-instance behaviour of the engine lock.

mod harness;
mod support;

use chrono::Duration;
use fplwatch::domain::{RunKind, RunStatus};
use fplwatch::error::Error;
use fplwatch::port::{CycleCommit, EngineLock, RunLog, SnapshotStore};
use fplwatch::testkit::domain::{base_time, open_gameweek};
use fplwatch::testkit::fetcher::ScriptedFetcher;
use fplwatch::testkit::memory::MemoryStore;

use support::engine::{manual_clock, MemoryEngine};
use support::matchday::{quiet, script_live};

fn pair() -> (MemoryEngine, MemoryEngine) {
    let store = MemoryStore::new();
    let clock = manual_clock();
    let (striker, keeper) = quiet();

    let primary_fetcher = ScriptedFetcher::new();
    script_live(&primary_fetcher, striker, keeper);
    let standby_fetcher = ScriptedFetcher::new();
    script_live(&standby_fetcher, striker, keeper);

    (
        MemoryEngine::with("primary", store.clone(), primary_fetcher, clock.clone()),
        MemoryEngine::with("standby", store, standby_fetcher, clock),
    )
}

#[tokio::test]
async fn second_instance_stands_by_without_fetching() {
    let (mut primary, mut standby) = pair();

    assert_eq!(primary.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Success);
    let run = standby.scheduler.tick(RunKind::Monitor).await;

    assert_eq!(run.status, RunStatus::Standby);
    assert!(run.monitors.is_empty());
    assert_eq!(standby.fetcher.fixture_calls(), 0);
    assert_eq!(standby.fetcher.bootstrap_calls(), 0);
    assert_eq!(standby.store.commits(), 1);
    assert_eq!(standby.store.lock_holder().as_deref(), Some("primary"));

    let runs = standby.store.recent_runs(1).expect("runs");
    assert_eq!(runs[0].status, RunStatus::Standby);
}

#[tokio::test]
async fn released_lock_is_taken_over() {
    let (mut primary, mut standby) = pair();
    primary.scheduler.tick(RunKind::Monitor).await;
    primary.scheduler.release().expect("release");

    let run = standby.scheduler.tick(RunKind::Monitor).await;

    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(standby.store.lock_holder().as_deref(), Some("standby"));
}

#[tokio::test]
async fn stale_lock_is_taken_over_after_ttl() {
    let (mut primary, mut standby) = pair();
    primary.scheduler.tick(RunKind::Monitor).await;

    primary.clock.advance(Duration::seconds(120));
    assert_eq!(standby.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Standby);

    primary.clock.advance(Duration::seconds(300));
    assert_eq!(standby.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Success);
    assert_eq!(standby.store.lock_holder().as_deref(), Some("standby"));

    // The old holder now stands by in turn.
    assert_eq!(primary.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Standby);
}

#[tokio::test]
async fn renewed_lease_outlives_a_long_sleep() {
    let (mut primary, mut standby) = pair();
    primary.scheduler.tick(RunKind::Monitor).await;
    assert_eq!(primary.scheduler.heartbeat_interval(), Duration::seconds(100));

    // Two heartbeats across a sleep longer than the TTL.
    primary.clock.advance(Duration::seconds(100));
    assert!(primary.scheduler.renew_lease().expect("renew"));
    primary.clock.advance(Duration::seconds(100));
    assert!(primary.scheduler.renew_lease().expect("renew"));
    primary.clock.advance(Duration::seconds(200));

    assert_eq!(standby.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Standby);
    assert!(!standby.scheduler.renew_lease().expect("renew"));
    assert_eq!(standby.store.lock_holder().as_deref(), Some("primary"));
}

#[tokio::test]
async fn lapsed_lease_is_not_renewed_after_takeover() {
    let (mut primary, mut standby) = pair();
    primary.scheduler.tick(RunKind::Monitor).await;

    primary.clock.advance(Duration::seconds(301));
    assert_eq!(standby.scheduler.tick(RunKind::Monitor).await.status, RunStatus::Success);

    assert!(!primary.scheduler.renew_lease().expect("renew"));
    assert_eq!(standby.store.lock_holder().as_deref(), Some("standby"));
}

#[test]
fn commit_from_a_former_holder_is_refused() {
    let store = MemoryStore::new();
    let ttl = Duration::seconds(300);
    assert!(store.try_acquire("primary", base_time(), ttl).expect("acquire"));
    assert!(store
        .try_acquire("standby", base_time() + Duration::seconds(301), ttl)
        .expect("acquire"));

    let err = store
        .commit(CycleCommit {
            gameweeks: vec![open_gameweek(4)],
            at: base_time(),
            lock_owner: Some("primary".into()),
            ..CycleCommit::default()
        })
        .expect_err("fenced out");

    assert!(matches!(err, Error::LockLost(ref holder) if holder == "standby"));
    assert_eq!(store.commits(), 0);
    assert!(store.load_gameweeks().expect("gameweeks").is_empty());
}

