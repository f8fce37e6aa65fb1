//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the provider API, the database, notification sinks).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Fetcher │            │   Store     │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`DataFetcher`] - Provider snapshots (bootstrap, fixtures, live)
//! - [`SnapshotStore`], [`RunLog`] - Committed state and cycle audit
//! - [`EngineLock`] - Single-instance advisory lease
//! - [`Clock`] - Wall-clock time
//! - [`Notifier`] - Event delivery (logging, webhook)

pub mod outbound;

pub use outbound::clock::Clock;
pub use outbound::fetcher::{Bootstrap, DataFetcher};
pub use outbound::lock::EngineLock;
pub use outbound::notifier::{LogNotifier, Notifier, NotifierRegistry, NullNotifier};
pub use outbound::store::{CommitOutcome, CycleCommit, RunLog, SnapshotStore};
