//! Scripted provider for exercising cycles without HTTP.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{FixtureState, GameweekId, GameweekState, LiveStats, PlayerSnapshot};
use crate::error::FetchError;
use crate::port::{Bootstrap, DataFetcher};

#[derive(Default)]
struct Script {
    players: Vec<PlayerSnapshot>,
    gameweeks: Vec<GameweekState>,
    fixtures: Vec<FixtureState>,
    live: HashMap<GameweekId, Vec<LiveStats>>,
    fail_bootstrap: bool,
    fail_fixtures: bool,
    fail_live: bool,
}

/// A [`DataFetcher`] that serves whatever the test last set.
///
/// Every endpoint can be made to fail with an HTTP 503 to simulate an
/// outage. Call counters are shared so clones observe the same totals.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    script: Arc<Mutex<Script>>,
    bootstrap_calls: Arc<AtomicU32>,
    fixture_calls: Arc<AtomicU32>,
    live_calls: Arc<AtomicU32>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_players(&self, players: Vec<PlayerSnapshot>) {
        self.script.lock().expect("lock script").players = players;
    }

    pub fn set_gameweeks(&self, gameweeks: Vec<GameweekState>) {
        self.script.lock().expect("lock script").gameweeks = gameweeks;
    }

    pub fn set_fixtures(&self, fixtures: Vec<FixtureState>) {
        self.script.lock().expect("lock script").fixtures = fixtures;
    }

    pub fn set_live(&self, gameweek: u32, rows: Vec<LiveStats>) {
        self.script
            .lock()
            .expect("lock script")
            .live
            .insert(GameweekId::new(gameweek), rows);
    }

    pub fn fail_bootstrap(&self, fail: bool) {
        self.script.lock().expect("lock script").fail_bootstrap = fail;
    }

    pub fn fail_fixtures(&self, fail: bool) {
        self.script.lock().expect("lock script").fail_fixtures = fail;
    }

    pub fn fail_live(&self, fail: bool) {
        self.script.lock().expect("lock script").fail_live = fail;
    }

    pub fn bootstrap_calls(&self) -> u32 {
        self.bootstrap_calls.load(Ordering::SeqCst)
    }

    pub fn fixture_calls(&self) -> u32 {
        self.fixture_calls.load(Ordering::SeqCst)
    }

    pub fn live_calls(&self) -> u32 {
        self.live_calls.load(Ordering::SeqCst)
    }

    fn outage(path: &str) -> FetchError {
        FetchError::Status {
            url: format!("scripted://{path}"),
            status: 503,
        }
    }
}

#[async_trait]
impl DataFetcher for ScriptedFetcher {
    async fn fetch_bootstrap(&self) -> Result<Bootstrap, FetchError> {
        self.bootstrap_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("lock script");
        if script.fail_bootstrap {
            return Err(Self::outage("bootstrap-static"));
        }
        Ok(Bootstrap {
            players: script.players.clone(),
            gameweeks: script.gameweeks.clone(),
            skipped: Vec::new(),
        })
    }

    async fn fetch_fixtures(&self) -> Result<Vec<FixtureState>, FetchError> {
        self.fixture_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("lock script");
        if script.fail_fixtures {
            return Err(Self::outage("fixtures"));
        }
        Ok(script.fixtures.clone())
    }

    async fn fetch_live(&self, gameweek: GameweekId) -> Result<Vec<LiveStats>, FetchError> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("lock script");
        if script.fail_live {
            return Err(Self::outage("event/live"));
        }
        Ok(script.live.get(&gameweek).cloned().unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
