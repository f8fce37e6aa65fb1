//! Settable clock.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::port::Clock;

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("lock manual clock") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("lock manual clock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("lock manual clock")
    }
}
