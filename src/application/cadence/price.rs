//! Daily price window monitor.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;

use super::policy::{CadencePolicy, Requirements};
use crate::domain::{DailyWindow, Event, EventKind, GameState, MonitorKind};

/// Due inside the configured daily window until the day's price changes
/// have been seen.
///
/// The provider publishes one batch per day; once a cycle inside the window
/// detects a price change, the monitor latches for that window's local date.
pub struct PriceWindow {
    window: DailyWindow,
    interval: Duration,
    latched: Mutex<Option<NaiveDate>>,
}

impl PriceWindow {
    #[must_use]
    pub fn new(window: DailyWindow, interval: Duration) -> Self {
        Self {
            window,
            interval,
            latched: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn window(&self) -> &DailyWindow {
        &self.window
    }

    fn is_latched(&self, now: DateTime<Utc>) -> bool {
        *self.latched.lock() == Some(self.window.local_date(now))
    }
}

impl CadencePolicy for PriceWindow {
    fn kind(&self) -> MonitorKind {
        MonitorKind::PriceWindow
    }

    fn is_due(&self, now: DateTime<Utc>, _state: &GameState) -> bool {
        self.window.contains(now) && !self.is_latched(now)
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            bootstrap: true,
            ..Requirements::NONE
        }
    }

    fn next_opening(&self, now: DateTime<Utc>, _state: &GameState) -> Option<DateTime<Utc>> {
        self.window.next_open(now)
    }

    fn observe(&self, now: DateTime<Utc>, events: &[Event]) {
        if self.window.contains(now) && events.iter().any(|e| e.kind == EventKind::PriceChange) {
            *self.latched.lock() = Some(self.window.local_date(now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventValue, GameweekId, PlayerId, Price};
    use chrono::{NaiveTime, TimeZone};

    fn policy() -> PriceWindow {
        let window = DailyWindow::try_new(
            chrono_tz::America::Los_Angeles,
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 40, 0).unwrap(),
        )
        .unwrap();
        PriceWindow::new(window, Duration::seconds(300))
    }

    fn state(now: DateTime<Utc>) -> GameState {
        GameState::new(now, vec![], vec![])
    }

    // 18:30 PDT on 2025-08-19 is 01:30 UTC on 2025-08-20.
    fn pacific(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, h - 17, m, s).unwrap()
    }

    fn price_event(now: DateTime<Utc>) -> Event {
        Event {
            kind: EventKind::PriceChange,
            player_id: PlayerId::new(1),
            gameweek: GameweekId::new(1),
            old_value: EventValue::Price(Price::from_tenths(50)),
            new_value: EventValue::Price(Price::from_tenths(51)),
            points_change: 0,
            timestamp: now,
        }
    }

    #[test]
    fn due_exactly_inside_window() {
        let policy = policy();
        let before = pacific(18, 29, 59);
        let open = pacific(18, 30, 0);
        let close = pacific(18, 40, 0);
        assert!(!policy.is_due(before, &state(before)));
        assert!(policy.is_due(open, &state(open)));
        assert!(!policy.is_due(close, &state(close)));
    }

    #[test]
    fn latches_after_detecting_a_change() {
        let policy = policy();
        let first = pacific(18, 30, 0);
        policy.observe(first, &[]);
        assert!(policy.is_due(first, &state(first)));

        policy.observe(first, &[price_event(first)]);
        let later = pacific(18, 35, 0);
        assert!(!policy.is_due(later, &state(later)));

        let tomorrow = later + Duration::days(1);
        assert!(policy.is_due(tomorrow, &state(tomorrow)));
    }

    #[test]
    fn next_opening_points_at_window_start() {
        let policy = policy();
        let now = pacific(18, 0, 0);
        assert_eq!(policy.next_opening(now, &state(now)), Some(pacific(18, 30, 0)));
    }
}
