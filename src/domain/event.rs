//! Notification events produced by the scoring rules.
//!
//! An [`Event`] is immutable once built. It is the only output of the diff
//! stage and the only input the dispatcher sees; formatters downstream map
//! [`EventKind`] one-to-one onto message templates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{GameweekId, PlayerId};
use super::player::{Availability, Price};

/// Card colour for [`EventKind::Card`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColour {
    Yellow,
    Red,
}

/// The thirteen event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "colour")]
pub enum EventKind {
    Goal,
    Assist,
    CleanSheet,
    Card(CardColour),
    PenaltySaved,
    PenaltyMissed,
    OwnGoal,
    Saves,
    GoalsConceded,
    DefensiveContribution,
    Bonus,
    PriceChange,
    StatusChange,
}

impl EventKind {
    /// Stable label, used as the audit-trail discriminator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EventKind::Goal => "goal",
            EventKind::Assist => "assist",
            EventKind::CleanSheet => "clean_sheet",
            EventKind::Card(CardColour::Yellow) => "yellow_card",
            EventKind::Card(CardColour::Red) => "red_card",
            EventKind::PenaltySaved => "penalty_saved",
            EventKind::PenaltyMissed => "penalty_missed",
            EventKind::OwnGoal => "own_goal",
            EventKind::Saves => "saves",
            EventKind::GoalsConceded => "goals_conceded",
            EventKind::DefensiveContribution => "defensive_contribution",
            EventKind::Bonus => "bonus",
            EventKind::PriceChange => "price_change",
            EventKind::StatusChange => "status_change",
        }
    }

    /// Events derived from in-match counters.
    #[must_use]
    pub const fn is_performance(self) -> bool {
        !matches!(
            self,
            EventKind::Bonus | EventKind::PriceChange | EventKind::StatusChange
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value carried on either side of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum EventValue {
    /// A cumulative counter (goals, saves, bonus...).
    Count(i32),
    /// A price in tenths.
    Price(Price),
    /// Status code plus news text.
    Availability(Availability),
}

impl EventValue {
    /// Numeric view of the value, if it has one.
    #[must_use]
    pub fn as_number(&self) -> Option<i32> {
        match self {
            EventValue::Count(n) => Some(*n),
            EventValue::Price(p) => Some(p.tenths()),
            EventValue::Availability(_) => None,
        }
    }
}

/// A single detected change, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub player_id: PlayerId,
    pub gameweek: GameweekId,
    pub old_value: EventValue,
    pub new_value: EventValue,
    /// Fantasy points gained (positive) or lost (negative).
    pub points_change: i32,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Build a counter-based event.
    #[must_use]
    pub fn count(
        kind: EventKind,
        player_id: PlayerId,
        gameweek: GameweekId,
        old: i32,
        new: i32,
        points_change: i32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            player_id,
            gameweek,
            old_value: EventValue::Count(old),
            new_value: EventValue::Count(new),
            points_change,
            timestamp,
        }
    }

    /// Raw numeric delta between the new and old value (price tenths for
    /// price changes), or `None` for status changes.
    #[must_use]
    pub fn delta(&self) -> Option<i32> {
        Some(self.new_value.as_number()? - self.old_value.as_number()?)
    }
}
