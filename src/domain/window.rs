//! Daily wall-clock windows.
//!
//! [`in_window`] is the single definition of window membership. Nothing else
//! in the crate compares times of day against window bounds.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::DomainError;

/// Inclusive-start, exclusive-end membership test.
///
/// Both halves must hold; a time is in `[start, end)` only when it is at or
/// after `start` *and* strictly before `end`.
#[must_use]
pub fn in_window(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    start <= now && now < end
}

/// A `[start, end)` window repeated every day in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    tz: Tz,
    start: NaiveTime,
    end: NaiveTime,
}

impl DailyWindow {
    /// Build a window, rejecting empty or inverted ranges.
    ///
    /// Windows that wrap past midnight are not supported.
    pub fn try_new(tz: Tz, start: NaiveTime, end: NaiveTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvertedWindow { start, end });
        }
        Ok(Self { tz, start, end })
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    #[must_use]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether `now` falls inside today's window in the window's timezone.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        in_window(now.with_timezone(&self.tz).time(), self.start, self.end)
    }

    /// Local calendar date of `now`, identifying which day's window it is.
    #[must_use]
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// The next instant the window opens strictly after `now`.
    ///
    /// Days where the opening time does not exist locally (a DST gap) are
    /// skipped.
    #[must_use]
    pub fn next_open(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = self.local_date(now);
        (0..=2)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter_map(|date| {
                self.tz
                    .from_local_datetime(&date.and_time(self.start))
                    .earliest()
            })
            .map(|local| local.with_timezone(&Utc))
            .find(|open| *open > now)
    }
}
