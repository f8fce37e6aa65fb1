use std::sync::Arc;

use fplwatch::application::cadence::CadenceRegistry;
use fplwatch::application::{CycleEngine, Scheduler, SchedulerPorts, SchedulerSettings};
use fplwatch::domain::{ScoringEngine, ScoringTable};
use fplwatch::infrastructure::config::Config;
use fplwatch::port::NotifierRegistry;
use fplwatch::testkit::clock::ManualClock;
use fplwatch::testkit::config::FULL_CONFIG_TOML;
use fplwatch::testkit::domain::base_time;
use fplwatch::testkit::fetcher::ScriptedFetcher;
use fplwatch::testkit::memory::MemoryStore;

use crate::harness::recording_notifier::RecordingNotifier;

pub fn test_config() -> Config {
    Config::parse_toml(FULL_CONFIG_TOML).expect("parse test config")
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(base_time()))
}

/// A scheduler over in-memory collaborators, with handles to all of them.
pub struct MemoryEngine {
    pub scheduler: Scheduler,
    pub store: MemoryStore,
    pub fetcher: ScriptedFetcher,
    pub clock: Arc<ManualClock>,
    pub notifier: RecordingNotifier,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::with(
            "test-owner",
            MemoryStore::new(),
            ScriptedFetcher::new(),
            manual_clock(),
        )
    }

    /// Build an engine sharing `store` and `clock` with other engines.
    pub fn with(
        owner: &str,
        store: MemoryStore,
        fetcher: ScriptedFetcher,
        clock: Arc<ManualClock>,
    ) -> Self {
        let config = test_config();
        let registry = CadenceRegistry::standard(
            config.price_window.window().expect("valid price window"),
            config.cadence.intervals(),
        );
        Self::assemble(owner, store, fetcher, clock, registry)
    }

    /// Build an engine that runs only the given monitors.
    pub fn with_registry(registry: CadenceRegistry) -> Self {
        Self::assemble(
            "test-owner",
            MemoryStore::new(),
            ScriptedFetcher::new(),
            manual_clock(),
            registry,
        )
    }

    fn assemble(
        owner: &str,
        store: MemoryStore,
        fetcher: ScriptedFetcher,
        clock: Arc<ManualClock>,
        registry: CadenceRegistry,
    ) -> Self {
        let config = test_config();
        let notifier = RecordingNotifier::new();
        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(notifier.clone()));

        let store_port = Arc::new(store.clone());
        let engine = CycleEngine::new(
            Arc::new(fetcher.clone()),
            store_port.clone(),
            Arc::new(notifiers),
            ScoringEngine::new(ScoringTable::standard()),
        );
        let ports = SchedulerPorts {
            store: store_port.clone(),
            runs: store_port.clone(),
            lock: store_port,
            clock: clock.clone(),
        };
        let settings = SchedulerSettings {
            service_name: config.service_name.clone(),
            lock_owner: owner.to_string(),
            lock_ttl: config.lock_ttl(),
            timing: config.cadence.timing(),
        };

        Self {
            scheduler: Scheduler::new(engine, registry, ports, settings),
            store,
            fetcher,
            clock,
            notifier,
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }
}
