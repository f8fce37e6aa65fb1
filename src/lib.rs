//! fplwatch - Fantasy Premier League change detection and notification.
//!
//! The engine polls the public FPL API on a cadence that follows the state
//! of the game, diffs each fetch against the last committed snapshot, and
//! turns the differences into point-scored [`domain::Event`]s that are
//! persisted and then handed to notifiers.
//!
//! # Architecture
//!
//! - [`domain`] - Players, fixtures, stat lines, events and scoring rules
//! - [`port`] - Traits for the provider, the store, the lock and notifiers
//! - [`application`] - Cadence policies, the diff, the cycle and the scheduler
//! - [`adapter`] - FPL HTTP client, SQLite store, webhook notifier, CLI
//! - [`infrastructure`] - Configuration and wiring
//!
//! # Features
//!
//! - `testkit` - In-memory store, scripted fetcher and manual clock for tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
