//! Scoring rules: counter deltas to typed events.
//!
//! Everything here is pure. Callers pass the last committed value and the
//! freshly fetched value side by side; nothing is remembered between calls.
//!
//! Three families of rules exist:
//!
//! - **Cumulative** stats score `delta * value[position]` on every change.
//! - **Threshold** stats score only when `floor(count / divisor)` moves, and
//!   report the new cumulative count rather than the raw delta.
//! - **Qualification** stats (clean sheet, defensive contribution) score a
//!   flat amount when the qualified state flips.
//!
//! A positional value of zero means the stat does not score for that
//! position and never produces an event.

use chrono::{DateTime, Utc};

use super::event::{CardColour, Event, EventKind, EventValue};
use super::id::{GameweekId, PlayerId};
use super::player::PlayerSnapshot;
use super::position::Position;
use super::stats::Counters;

/// Point values keyed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalPoints {
    pub goalkeeper: i32,
    pub defender: i32,
    pub midfielder: i32,
    pub forward: i32,
}

impl PositionalPoints {
    /// Same value for every position.
    #[must_use]
    pub const fn flat(points: i32) -> Self {
        Self {
            goalkeeper: points,
            defender: points,
            midfielder: points,
            forward: points,
        }
    }

    #[must_use]
    pub const fn for_position(&self, position: Position) -> i32 {
        match position {
            Position::Goalkeeper => self.goalkeeper,
            Position::Defender => self.defender,
            Position::Midfielder => self.midfielder,
            Position::Forward => self.forward,
        }
    }
}

/// Counters that score on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CumulativeStat {
    Goals,
    Assists,
    YellowCards,
    RedCards,
    PenaltiesSaved,
    PenaltiesMissed,
    OwnGoals,
}

impl CumulativeStat {
    pub const ALL: [CumulativeStat; 7] = [
        CumulativeStat::Goals,
        CumulativeStat::Assists,
        CumulativeStat::YellowCards,
        CumulativeStat::RedCards,
        CumulativeStat::PenaltiesSaved,
        CumulativeStat::PenaltiesMissed,
        CumulativeStat::OwnGoals,
    ];

    #[must_use]
    pub const fn kind(self) -> EventKind {
        match self {
            CumulativeStat::Goals => EventKind::Goal,
            CumulativeStat::Assists => EventKind::Assist,
            CumulativeStat::YellowCards => EventKind::Card(CardColour::Yellow),
            CumulativeStat::RedCards => EventKind::Card(CardColour::Red),
            CumulativeStat::PenaltiesSaved => EventKind::PenaltySaved,
            CumulativeStat::PenaltiesMissed => EventKind::PenaltyMissed,
            CumulativeStat::OwnGoals => EventKind::OwnGoal,
        }
    }

    #[must_use]
    pub const fn read(self, counters: &Counters) -> i32 {
        match self {
            CumulativeStat::Goals => counters.goals_scored,
            CumulativeStat::Assists => counters.assists,
            CumulativeStat::YellowCards => counters.yellow_cards,
            CumulativeStat::RedCards => counters.red_cards,
            CumulativeStat::PenaltiesSaved => counters.penalties_saved,
            CumulativeStat::PenaltiesMissed => counters.penalties_missed,
            CumulativeStat::OwnGoals => counters.own_goals,
        }
    }
}

/// Counters that score once per multiple of a divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdStat {
    Saves,
    GoalsConceded,
}

impl ThresholdStat {
    #[must_use]
    pub const fn kind(self) -> EventKind {
        match self {
            ThresholdStat::Saves => EventKind::Saves,
            ThresholdStat::GoalsConceded => EventKind::GoalsConceded,
        }
    }

    #[must_use]
    pub const fn read(self, counters: &Counters) -> i32 {
        match self {
            ThresholdStat::Saves => counters.saves,
            ThresholdStat::GoalsConceded => counters.goals_conceded,
        }
    }
}

/// A threshold rule: every `divisor` units score `points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRule {
    pub divisor: i32,
    /// Points per crossing, by position. Zero disables the rule.
    pub points: PositionalPoints,
}

impl ThresholdRule {
    /// Signed number of multiples crossed between `old` and `new`.
    #[must_use]
    pub fn crossing(&self, old: i32, new: i32) -> i32 {
        if self.divisor <= 0 {
            return 0;
        }
        new.div_euclid(self.divisor) - old.div_euclid(self.divisor)
    }
}

/// The full scoring table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringTable {
    pub goal: PositionalPoints,
    pub assist: PositionalPoints,
    pub yellow_card: PositionalPoints,
    pub red_card: PositionalPoints,
    pub penalty_saved: PositionalPoints,
    pub penalty_missed: PositionalPoints,
    pub own_goal: PositionalPoints,
    pub clean_sheet: PositionalPoints,
    pub clean_sheet_min_minutes: i32,
    pub saves: ThresholdRule,
    pub goals_conceded: ThresholdRule,
    /// Defensive actions needed to qualify. Zero disables the rule.
    pub defcon_threshold: PositionalPoints,
    pub defcon_points: i32,
}

impl ScoringTable {
    /// The current season's rules.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            goal: PositionalPoints {
                goalkeeper: 6,
                defender: 6,
                midfielder: 5,
                forward: 4,
            },
            assist: PositionalPoints::flat(3),
            yellow_card: PositionalPoints::flat(-1),
            red_card: PositionalPoints::flat(-3),
            penalty_saved: PositionalPoints {
                goalkeeper: 5,
                defender: 0,
                midfielder: 0,
                forward: 0,
            },
            penalty_missed: PositionalPoints::flat(-2),
            own_goal: PositionalPoints::flat(-2),
            clean_sheet: PositionalPoints {
                goalkeeper: 4,
                defender: 4,
                midfielder: 1,
                forward: 0,
            },
            clean_sheet_min_minutes: 60,
            saves: ThresholdRule {
                divisor: 3,
                points: PositionalPoints {
                    goalkeeper: 1,
                    defender: 0,
                    midfielder: 0,
                    forward: 0,
                },
            },
            goals_conceded: ThresholdRule {
                divisor: 2,
                points: PositionalPoints {
                    goalkeeper: -1,
                    defender: -1,
                    midfielder: 0,
                    forward: 0,
                },
            },
            defcon_threshold: PositionalPoints {
                goalkeeper: 0,
                defender: 10,
                midfielder: 12,
                forward: 12,
            },
            defcon_points: 2,
        }
    }

    #[must_use]
    pub const fn cumulative(&self, stat: CumulativeStat) -> &PositionalPoints {
        match stat {
            CumulativeStat::Goals => &self.goal,
            CumulativeStat::Assists => &self.assist,
            CumulativeStat::YellowCards => &self.yellow_card,
            CumulativeStat::RedCards => &self.red_card,
            CumulativeStat::PenaltiesSaved => &self.penalty_saved,
            CumulativeStat::PenaltiesMissed => &self.penalty_missed,
            CumulativeStat::OwnGoals => &self.own_goal,
        }
    }

    #[must_use]
    pub const fn threshold(&self, stat: ThresholdStat) -> &ThresholdRule {
        match stat {
            ThresholdStat::Saves => &self.saves,
            ThresholdStat::GoalsConceded => &self.goals_conceded,
        }
    }

    /// Whether these counters currently earn a clean sheet.
    #[must_use]
    pub fn clean_sheet_qualified(&self, position: Position, counters: &Counters) -> bool {
        self.clean_sheet.for_position(position) != 0
            && counters.minutes >= self.clean_sheet_min_minutes
            && counters.goals_conceded == 0
    }

    /// Whether these counters currently earn the defensive contribution award.
    #[must_use]
    pub fn defcon_qualified(&self, position: Position, counters: &Counters) -> bool {
        let threshold = self.defcon_threshold.for_position(position);
        threshold > 0 && counters.defensive_contribution >= threshold
    }
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Who and when an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    pub player: PlayerId,
    pub gameweek: GameweekId,
    pub timestamp: DateTime<Utc>,
}

impl EventContext {
    fn count(&self, kind: EventKind, old: i32, new: i32, points: i32) -> Event {
        Event::count(kind, self.player, self.gameweek, old, new, points, self.timestamp)
    }
}

/// Pure mapping from old/new values to events.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    table: ScoringTable,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(table: ScoringTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// Score one cumulative stat.
    #[must_use]
    pub fn score_cumulative(
        &self,
        stat: CumulativeStat,
        position: Position,
        old: i32,
        new: i32,
        ctx: &EventContext,
    ) -> Option<Event> {
        let value = self.table.cumulative(stat).for_position(position);
        let delta = new - old;
        if delta == 0 || value == 0 {
            return None;
        }
        Some(ctx.count(stat.kind(), old, new, delta * value))
    }

    /// Score one threshold stat.
    #[must_use]
    pub fn score_threshold(
        &self,
        stat: ThresholdStat,
        position: Position,
        old: i32,
        new: i32,
        ctx: &EventContext,
    ) -> Option<Event> {
        let rule = self.table.threshold(stat);
        let per_crossing = rule.points.for_position(position);
        let crossing = rule.crossing(old, new);
        if crossing == 0 || per_crossing == 0 {
            return None;
        }
        Some(ctx.count(stat.kind(), old, new, crossing * per_crossing))
    }

    /// Clean sheet gained or lost. Values are reported as 0/1 qualified state.
    #[must_use]
    pub fn score_clean_sheet(
        &self,
        position: Position,
        old: &Counters,
        new: &Counters,
        ctx: &EventContext,
    ) -> Option<Event> {
        let was = self.table.clean_sheet_qualified(position, old);
        let is = self.table.clean_sheet_qualified(position, new);
        if was == is {
            return None;
        }
        let points = self.table.clean_sheet.for_position(position);
        let (old_flag, new_flag, signed) = if is { (0, 1, points) } else { (1, 0, -points) };
        Some(ctx.count(EventKind::CleanSheet, old_flag, new_flag, signed))
    }

    /// Defensive contribution award gained or lost. Values carry the
    /// cumulative action count.
    #[must_use]
    pub fn score_defcon(
        &self,
        position: Position,
        old: &Counters,
        new: &Counters,
        ctx: &EventContext,
    ) -> Option<Event> {
        let was = self.table.defcon_qualified(position, old);
        let is = self.table.defcon_qualified(position, new);
        if was == is {
            return None;
        }
        let points = if is {
            self.table.defcon_points
        } else {
            -self.table.defcon_points
        };
        Some(ctx.count(
            EventKind::DefensiveContribution,
            old.defensive_contribution,
            new.defensive_contribution,
            points,
        ))
    }

    /// Every in-match rule applied to one stat line. Bonus is excluded: it is
    /// only ever scored from finalized data through [`Self::score_bonus`].
    #[must_use]
    pub fn score_performance(
        &self,
        position: Position,
        old: &Counters,
        new: &Counters,
        ctx: &EventContext,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for stat in CumulativeStat::ALL {
            events.extend(self.score_cumulative(stat, position, stat.read(old), stat.read(new), ctx));
        }
        events.extend(self.score_clean_sheet(position, old, new, ctx));
        for stat in [ThresholdStat::Saves, ThresholdStat::GoalsConceded] {
            events.extend(self.score_threshold(stat, position, stat.read(old), stat.read(new), ctx));
        }
        events.extend(self.score_defcon(position, old, new, ctx));
        events
    }

    /// Official bonus delta. Bonus points are not positional.
    #[must_use]
    pub fn score_bonus(&self, old: i32, new: i32, ctx: &EventContext) -> Option<Event> {
        (new != old).then(|| ctx.count(EventKind::Bonus, old, new, new - old))
    }

    /// Price movement between two snapshots of the same player.
    #[must_use]
    pub fn score_price(
        &self,
        old: &PlayerSnapshot,
        new: &PlayerSnapshot,
        ctx: &EventContext,
    ) -> Option<Event> {
        (old.price != new.price).then(|| Event {
            kind: EventKind::PriceChange,
            player_id: ctx.player,
            gameweek: ctx.gameweek,
            old_value: EventValue::Price(old.price),
            new_value: EventValue::Price(new.price),
            points_change: 0,
            timestamp: ctx.timestamp,
        })
    }

    /// Status code or news text change.
    #[must_use]
    pub fn score_status(
        &self,
        old: &PlayerSnapshot,
        new: &PlayerSnapshot,
        ctx: &EventContext,
    ) -> Option<Event> {
        (old.availability != new.availability).then(|| Event {
            kind: EventKind::StatusChange,
            player_id: ctx.player,
            gameweek: ctx.gameweek,
            old_value: EventValue::Availability(old.availability.clone()),
            new_value: EventValue::Availability(new.availability.clone()),
            points_change: 0,
            timestamp: ctx.timestamp,
        })
    }
}
