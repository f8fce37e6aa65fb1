//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fetcher`] - `ScriptedFetcher`, a [`DataFetcher`](crate::port::DataFetcher)
//!   serving canned provider snapshots with injectable failures.
//! - [`clock`] - `ManualClock`, a settable [`Clock`](crate::port::Clock).
//! - [`memory`] - `MemoryStore`, an in-process store, run log and lock.
//! - [`domain`] - Builders for players, fixtures, gameweeks and counters.
//! - [`config`] - Canonical test configuration.

pub mod clock;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod memory;
