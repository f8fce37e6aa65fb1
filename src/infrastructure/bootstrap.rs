//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! The composition root: turns a [`Config`] into a ready [`Scheduler`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::clock::SystemClock;
use crate::adapter::outbound::fpl::FplClient;
use crate::adapter::outbound::notifier::WebhookNotifier;
use crate::adapter::outbound::sqlite::{
    open, DbPool, SqliteEngineLock, SqliteRunLog, SqliteSnapshotStore,
};
use crate::application::cadence::CadenceRegistry;
use crate::application::{CycleEngine, Scheduler, SchedulerPorts, SchedulerSettings};
use crate::domain::{ScoringEngine, ScoringTable};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{Clock, DataFetcher, LogNotifier, NotifierRegistry};

/// Build notifier registry from configuration.
///
/// Must be called from within a Tokio runtime when a webhook is configured.
///
/// # Errors
/// Returns an error if the webhook URL is invalid.
pub fn build_notifier_registry(config: &Config) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    if config.notifier.log {
        registry.register(Box::new(LogNotifier));
    }
    if let Some(webhook) = config.notifier.webhook()? {
        info!(url = %webhook.url, "Webhook notifier enabled");
        registry.register(Box::new(WebhookNotifier::new(webhook)));
    }
    Ok(registry)
}

/// Open the configured database and run migrations.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open_database(config: &Config) -> Result<DbPool> {
    if let Some(parent) = std::path::Path::new(&config.database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    open(&config.database)
}

/// Wire a scheduler from explicit collaborators.
///
/// # Errors
/// Returns an error if the configured price window or webhook is invalid.
pub fn assemble(
    config: &Config,
    pool: DbPool,
    fetcher: Arc<dyn DataFetcher>,
    clock: Arc<dyn Clock>,
) -> Result<Scheduler> {
    let store = Arc::new(SqliteSnapshotStore::new(pool.clone()));
    let notifiers = Arc::new(build_notifier_registry(config)?);
    let registry = CadenceRegistry::standard(
        config.price_window.window()?,
        config.cadence.intervals(),
    );

    let engine = CycleEngine::new(
        fetcher,
        store.clone(),
        notifiers,
        ScoringEngine::new(ScoringTable::standard()),
    );
    let ports = SchedulerPorts {
        store,
        runs: Arc::new(SqliteRunLog::new(pool.clone())),
        lock: Arc::new(SqliteEngineLock::new(pool)),
        clock,
    };
    let settings = SchedulerSettings {
        service_name: config.service_name.clone(),
        lock_owner: config.lock.owner(),
        lock_ttl: config.lock_ttl(),
        timing: config.cadence.timing(),
    };

    info!(
        database = %config.database,
        owner = %settings.lock_owner,
        monitors = registry.len(),
        "Engine assembled"
    );
    Ok(Scheduler::new(engine, registry, ports, settings))
}

/// Build the production scheduler: SQLite, the FPL API and the system clock.
///
/// # Errors
/// Returns an error if the database cannot be opened or the configuration
/// does not describe a valid engine.
pub fn build_scheduler(config: &Config) -> Result<Scheduler> {
    let pool = open_database(config)?;
    let fetcher: Arc<dyn DataFetcher> = Arc::new(FplClient::from_config(&config.source));
    info!(source = fetcher.source_name(), base_url = %config.source.base_url, "Data source ready");
    assemble(config, pool, fetcher, Arc::new(SystemClock))
}
