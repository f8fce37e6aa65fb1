//! DTO to domain conversion.
//!
//! Each function handles one entity and reports a [`DataIntegrityError`]
//! instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::dto::{
    ElementDto, ExplainDto, FixtureDto, GameweekDto, LiveElementDto, LiveStatsDto,
};
use crate::domain::{
    Availability, Counters, FixtureId, FixtureState, GameweekId, GameweekState, LiveStats,
    PlayerId, PlayerSnapshot, PlayerStatus, Position, Price, TeamId,
};
use crate::error::DataIntegrityError;

fn raw_id(value: &Value) -> i64 {
    value.get("id").and_then(Value::as_i64).unwrap_or(-1)
}

fn decode<T: DeserializeOwned>(entity: &'static str, value: Value) -> Result<T, DataIntegrityError> {
    let id = raw_id(&value);
    serde_json::from_value(value).map_err(|e| DataIntegrityError::new(entity, id, e.to_string()))
}

fn require<T>(entity: &'static str, id: i64, field: &str, value: Option<T>) -> Result<T, DataIntegrityError> {
    value.ok_or_else(|| DataIntegrityError::new(entity, id, format!("missing {field}")))
}

/// Convert one `bootstrap-static/.elements` entry.
pub fn player(value: Value) -> Result<PlayerSnapshot, DataIntegrityError> {
    let dto: ElementDto = decode("player", value)?;
    let id = dto.id;
    let player_id = u32::try_from(id)
        .map_err(|_| DataIntegrityError::new("player", id, "id out of range"))?;
    let position = Position::try_from(require("player", id, "element_type", dto.element_type)?)
        .map_err(|e| DataIntegrityError::new("player", id, e.to_string()))?;
    let price = require("player", id, "now_cost", dto.now_cost)?;
    if price < 0 {
        return Err(DataIntegrityError::new("player", id, format!("negative now_cost {price}")));
    }

    Ok(PlayerSnapshot {
        id: PlayerId::new(player_id),
        team: TeamId::new(require("player", id, "team", dto.team)?),
        web_name: require("player", id, "web_name", dto.web_name)?,
        position,
        price: Price::from_tenths(price),
        availability: Availability {
            status: PlayerStatus::from(require("player", id, "status", dto.status)?),
            news: dto.news.unwrap_or_default(),
        },
    })
}

/// Convert one `bootstrap-static/.events` entry.
pub fn gameweek(value: Value) -> Result<GameweekState, DataIntegrityError> {
    let dto: GameweekDto = decode("gameweek", value)?;
    Ok(GameweekState {
        id: GameweekId::new(dto.id),
        name: dto.name,
        is_current: dto.is_current,
        finished: dto.finished,
        data_checked: dto.data_checked,
        processed: false,
    })
}

/// Convert one `fixtures/` entry.
pub fn fixture(value: Value) -> Result<FixtureState, DataIntegrityError> {
    let dto: FixtureDto = decode("fixture", value)?;
    Ok(FixtureState {
        id: FixtureId::new(dto.id),
        gameweek: dto.event.map(GameweekId::new),
        home_team: TeamId::new(dto.team_h),
        away_team: TeamId::new(dto.team_a),
        kickoff_time: dto.kickoff_time,
        started: dto.started.unwrap_or(false),
        finished: dto.finished,
        home_score: dto.team_h_score,
        away_score: dto.team_a_score,
        minutes: dto.minutes,
    })
}

/// Convert one `event/{gw}/live/` entry.
///
/// A player with one fixture gets the gameweek totals against that
/// fixture. In a double gameweek the totals are split per fixture using
/// the points breakdown, which does not carry `bps` and only lists stats
/// that scored. Goals conceded the breakdown leaves out are put back on the
/// legs that played without a clean sheet, so no leg reads as a shutout it
/// was not. Saves and defensive contributions below their scoring threshold
/// stay unsplit.
pub fn live(value: Value, gameweek: GameweekId) -> Result<Vec<LiveStats>, DataIntegrityError> {
    let dto: LiveElementDto = decode("live stats", value)?;
    let player = PlayerId::new(dto.id);

    if dto.explain.len() <= 1 {
        return Ok(vec![LiveStats {
            player,
            gameweek,
            fixture: dto.explain.first().map(|e| FixtureId::new(e.fixture)),
            counters: totals(&dto.stats),
        }]);
    }

    let mut legs: Vec<Counters> = dto.explain.iter().map(breakdown).collect();
    reconcile_conceded(&mut legs, dto.stats.goals_conceded);

    Ok(dto
        .explain
        .iter()
        .zip(legs)
        .map(|(explain, counters)| LiveStats {
            player,
            gameweek,
            fixture: Some(FixtureId::new(explain.fixture)),
            counters,
        })
        .collect())
}

/// Spread goals conceded missing from the per-leg breakdown.
///
/// A leg with minutes, no clean sheet and nothing conceded must have
/// conceded at least once; later legs are filled first. Whatever is left
/// goes to the last such leg, or the last leg if there is none.
fn reconcile_conceded(legs: &mut [Counters], total: i32) {
    let split: i32 = legs.iter().map(|leg| leg.goals_conceded).sum();
    let mut missing = total - split;
    if missing <= 0 {
        return;
    }

    let conceded_unlisted = |leg: &Counters| leg.minutes > 0 && leg.clean_sheets == 0;

    for leg in legs.iter_mut().rev() {
        if missing == 0 {
            return;
        }
        if conceded_unlisted(&*leg) && leg.goals_conceded == 0 {
            leg.goals_conceded = 1;
            missing -= 1;
        }
    }

    if missing > 0 {
        let target = legs.iter().rposition(conceded_unlisted).or(legs.len().checked_sub(1));
        if let Some(index) = target {
            legs[index].goals_conceded += missing;
        }
    }
}

fn totals(stats: &LiveStatsDto) -> Counters {
    Counters {
        minutes: stats.minutes,
        goals_scored: stats.goals_scored,
        assists: stats.assists,
        clean_sheets: stats.clean_sheets,
        goals_conceded: stats.goals_conceded,
        own_goals: stats.own_goals,
        penalties_saved: stats.penalties_saved,
        penalties_missed: stats.penalties_missed,
        yellow_cards: stats.yellow_cards,
        red_cards: stats.red_cards,
        saves: stats.saves,
        bonus: stats.bonus,
        bps: stats.bps,
        defensive_contribution: stats.defensive_contribution,
    }
}

fn breakdown(explain: &ExplainDto) -> Counters {
    let mut counters = Counters::default();
    for stat in &explain.stats {
        let slot = match stat.identifier.as_str() {
            "minutes" => &mut counters.minutes,
            "goals_scored" => &mut counters.goals_scored,
            "assists" => &mut counters.assists,
            "clean_sheets" => &mut counters.clean_sheets,
            "goals_conceded" => &mut counters.goals_conceded,
            "own_goals" => &mut counters.own_goals,
            "penalties_saved" => &mut counters.penalties_saved,
            "penalties_missed" => &mut counters.penalties_missed,
            "yellow_cards" => &mut counters.yellow_cards,
            "red_cards" => &mut counters.red_cards,
            "saves" => &mut counters.saves,
            "bonus" => &mut counters.bonus,
            "defensive_contribution" => &mut counters.defensive_contribution,
            _ => continue,
        };
        *slot = stat.value;
    }
    counters
}
