//! Outbound adapters (driven side).

pub mod clock;
pub mod fpl;
pub mod notifier;
pub mod sqlite;
