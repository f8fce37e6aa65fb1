//! Advisory lock port.
//!
//! Guards snapshot commits and the bonus check-and-set against a second
//! engine instance accidentally running on the same database.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;

/// Single-holder lease with heartbeat.
pub trait EngineLock: Send + Sync {
    /// Take or renew the lease for `owner`.
    ///
    /// Succeeds when the lease is free, already held by `owner`, or its last
    /// heartbeat is older than `ttl`. Returns `false` when another owner
    /// holds a live lease.
    fn try_acquire(&self, owner: &str, now: DateTime<Utc>, ttl: Duration) -> Result<bool>;

    /// Give the lease up if `owner` holds it.
    fn release(&self, owner: &str) -> Result<()>;
}
