//! Registry of cadence policies.

use chrono::{DateTime, Duration, Utc};

use super::bonus::FinalBonus;
use super::live::LivePerformance;
use super::policy::{CadencePolicy, Requirements};
use super::price::PriceWindow;
use super::status::StatusChange;
use crate::domain::{DailyWindow, Event, GameState, MonitorKind};

/// Intervals for the standard monitor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceIntervals {
    pub live: Duration,
    pub price: Duration,
    pub bonus: Duration,
    pub status: Duration,
}

impl Default for CadenceIntervals {
    fn default() -> Self {
        Self {
            live: Duration::seconds(60),
            price: Duration::seconds(300),
            bonus: Duration::seconds(300),
            status: Duration::seconds(3600),
        }
    }
}

/// Registry of monitors.
///
/// Every registered policy is evaluated on every tick, in registration
/// order.
#[derive(Default)]
pub struct CadenceRegistry {
    policies: Vec<Box<dyn CadencePolicy>>,
}

impl CadenceRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The four standard monitors.
    #[must_use]
    pub fn standard(window: DailyWindow, intervals: CadenceIntervals) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LivePerformance::new(intervals.live)));
        registry.register(Box::new(PriceWindow::new(window, intervals.price)));
        registry.register(Box::new(FinalBonus::new(intervals.bonus)));
        registry.register(Box::new(StatusChange::new(intervals.status)));
        registry
    }

    /// Register a policy.
    pub fn register(&mut self, policy: Box<dyn CadencePolicy>) {
        self.policies.push(policy);
    }

    #[must_use]
    pub fn policies(&self) -> &[Box<dyn CadencePolicy>] {
        &self.policies
    }

    #[must_use]
    pub fn get(&self, kind: MonitorKind) -> Option<&dyn CadencePolicy> {
        self.policies
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| -> &dyn CadencePolicy { p.as_ref() })
    }

    /// Policies whose predicate holds at `now`, ignoring intervals.
    pub fn due<'a>(
        &'a self,
        now: DateTime<Utc>,
        state: &'a GameState,
    ) -> impl Iterator<Item = &'a dyn CadencePolicy> + 'a {
        self.policies
            .iter()
            .map(|p| -> &dyn CadencePolicy { p.as_ref() })
            .filter(move |p| p.is_due(now, state))
    }

    /// Combined fetch requirements of the given monitors.
    #[must_use]
    pub fn requirements(&self, kinds: &[MonitorKind]) -> Requirements {
        kinds
            .iter()
            .filter_map(|kind| self.get(*kind))
            .fold(Requirements::NONE, |acc, p| acc | p.requirements())
    }

    /// Feed a committed cycle's events back to the monitors that ran.
    pub fn observe(&self, kinds: &[MonitorKind], now: DateTime<Utc>, events: &[Event]) {
        for policy in self.policies.iter().filter(|p| kinds.contains(&p.kind())) {
            policy.observe(now, events);
        }
    }

    /// Number of registered policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixtureId, FixtureState, GameweekId, GameweekState, TeamId};
    use chrono::{NaiveTime, TimeZone};

    fn registry() -> CadenceRegistry {
        let window = DailyWindow::try_new(
            chrono_tz::America::Los_Angeles,
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 40, 0).unwrap(),
        )
        .unwrap();
        CadenceRegistry::standard(window, CadenceIntervals::default())
    }

    fn live_fixture() -> FixtureState {
        FixtureState {
            id: FixtureId::new(1),
            gameweek: Some(GameweekId::new(3)),
            home_team: TeamId::new(1),
            away_team: TeamId::new(2),
            kickoff_time: None,
            started: true,
            finished: false,
            home_score: Some(0),
            away_score: Some(0),
            minutes: 30,
        }
    }

    fn kinds(registry: &CadenceRegistry, now: DateTime<Utc>, state: &GameState) -> Vec<MonitorKind> {
        registry.due(now, state).map(|p| p.kind()).collect()
    }

    #[test]
    fn only_status_due_when_quiet() {
        let now = Utc.with_ymd_and_hms(2025, 8, 19, 12, 0, 0).unwrap();
        let state = GameState::new(now, vec![], vec![]);
        assert_eq!(kinds(&registry(), now, &state), vec![MonitorKind::StatusChange]);
    }

    #[test]
    fn live_match_and_price_window_overlap() {
        // 18:31 PDT.
        let now = Utc.with_ymd_and_hms(2025, 8, 20, 1, 31, 0).unwrap();
        let state = GameState::new(now, vec![live_fixture()], vec![]);
        assert_eq!(
            kinds(&registry(), now, &state),
            vec![
                MonitorKind::LivePerformance,
                MonitorKind::PriceWindow,
                MonitorKind::StatusChange
            ]
        );
    }

    #[test]
    fn bonus_due_for_finalized_gameweek() {
        let now = Utc.with_ymd_and_hms(2025, 8, 19, 12, 0, 0).unwrap();
        let gw = GameweekState {
            id: GameweekId::new(3),
            name: "Gameweek 3".into(),
            is_current: true,
            finished: true,
            data_checked: true,
            processed: false,
        };
        let state = GameState::new(now, vec![], vec![gw.clone()]);
        assert!(kinds(&registry(), now, &state).contains(&MonitorKind::FinalBonus));

        let processed = GameweekState {
            processed: true,
            ..gw
        };
        let state = GameState::new(now, vec![], vec![processed]);
        assert!(!kinds(&registry(), now, &state).contains(&MonitorKind::FinalBonus));
    }

    #[test]
    fn requirements_are_merged() {
        let registry = registry();
        let req = registry.requirements(&[MonitorKind::LivePerformance, MonitorKind::StatusChange]);
        assert!(req.bootstrap && req.fixtures && req.live);
        assert!(registry.requirements(&[]).is_empty());
    }
}
