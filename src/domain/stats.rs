//! Per-gameweek cumulative counters.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{FixtureId, GameweekId, PlayerId};

/// Cumulative counters for one player in one fixture.
///
/// Every field only ever grows during a fixture except when the provider
/// corrects an earlier value, which the scoring rules treat as a negative
/// delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counters {
    pub minutes: i32,
    pub goals_scored: i32,
    pub assists: i32,
    pub clean_sheets: i32,
    pub goals_conceded: i32,
    pub own_goals: i32,
    pub penalties_saved: i32,
    pub penalties_missed: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub saves: i32,
    pub bonus: i32,
    pub bps: i32,
    pub defensive_contribution: i32,
}

impl Counters {
    /// Reject negative values, which the provider never legitimately sends.
    ///
    /// `bps` is exempt: it can go below zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        let checks: [(&'static str, i32); 13] = [
            ("minutes", self.minutes),
            ("goals_scored", self.goals_scored),
            ("assists", self.assists),
            ("clean_sheets", self.clean_sheets),
            ("goals_conceded", self.goals_conceded),
            ("own_goals", self.own_goals),
            ("penalties_saved", self.penalties_saved),
            ("penalties_missed", self.penalties_missed),
            ("yellow_cards", self.yellow_cards),
            ("red_cards", self.red_cards),
            ("saves", self.saves),
            ("bonus", self.bonus),
            ("defensive_contribution", self.defensive_contribution),
        ];
        for (field, value) in checks {
            if value < 0 {
                return Err(DomainError::NegativeCounter {
                    field,
                    value: i64::from(value),
                });
            }
        }
        Ok(())
    }

    /// Copy of these counters with `bonus` taken from `other`.
    ///
    /// Live refreshes must not advance the committed bonus column; only the
    /// final-bonus unit of work writes it.
    #[must_use]
    pub fn with_bonus_of(self, other: &Counters) -> Self {
        Self {
            bonus: other.bonus,
            ..self
        }
    }
}

/// Unique key of a stat line row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatKey {
    pub player: PlayerId,
    pub fixture: FixtureId,
    pub gameweek: GameweekId,
}

/// Counters for one (player, fixture, gameweek).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub key: StatKey,
    pub counters: Counters,
}

impl StatLine {
    #[must_use]
    pub fn new(player: PlayerId, fixture: FixtureId, gameweek: GameweekId, counters: Counters) -> Self {
        Self {
            key: StatKey {
                player,
                fixture,
                gameweek,
            },
            counters,
        }
    }
}

/// One row of the live endpoint: a player's counters for a gameweek.
///
/// `fixture` is absent when the provider did not attribute the row to a
/// match; the diff stage resolves it from the player's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStats {
    pub player: PlayerId,
    pub gameweek: GameweekId,
    pub fixture: Option<FixtureId>,
    pub counters: Counters,
}
