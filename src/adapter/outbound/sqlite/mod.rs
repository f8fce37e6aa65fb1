//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the snapshot store, the run
//! log and the engine lock using Diesel ORM.

pub mod database;
pub mod lock;
pub mod run_log;
pub mod store;

pub use database::connection::{create_pool, open, run_migrations, DbPool};
pub use lock::SqliteEngineLock;
pub use run_log::SqliteRunLog;
pub use store::SqliteSnapshotStore;
