//! Wall-clock port.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Cadence decisions read time only through this trait so the scheduler can
/// be driven by a fake clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
