//! Database model types for Diesel ORM.
//!
//! Booleans are stored as 0/1 integers and timestamps as fixed-width
//! RFC 3339 UTC strings so that text comparison orders them correctly.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::schema::{
    engine_lock, events, fixtures, gameweeks, monitoring_runs, players, stat_lines,
};
use crate::domain::{
    Availability, Counters, Event, FixtureId, FixtureState, GameweekId, GameweekState,
    MonitoringRun, PlayerId, PlayerSnapshot, PlayerStatus, Position, Price, StatKey, StatLine,
    TeamId,
};
use crate::error::{Error, Result};

/// Encode a timestamp for storage.
#[must_use]
pub fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp.
///
/// # Errors
/// Returns [`Error::Parse`] if the column does not hold RFC 3339.
pub fn decode_time(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| Error::Parse(format!("timestamp '{raw}': {e}")))?
        .with_timezone(&Utc))
}

pub(crate) fn to_column(id: u32) -> Result<i32> {
    i32::try_from(id).map_err(|_| Error::Parse(format!("id {id} out of range")))
}

fn from_column(value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Parse(format!("negative id {value}")))
}

fn count_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn flag(value: bool) -> i32 {
    i32::from(value)
}

/// Database row for a player.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlayerRow {
    pub id: i32,
    pub team_id: i32,
    pub web_name: String,
    pub position: i32,
    pub price: i32,
    pub status: String,
    pub news: String,
    pub updated_at: String,
}

impl PlayerRow {
    pub fn from_domain(player: &PlayerSnapshot, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: to_column(player.id.get())?,
            team_id: to_column(player.team.get())?,
            web_name: player.web_name.clone(),
            position: player.position.code(),
            price: player.price.tenths(),
            status: player.status().code().to_string(),
            news: player.news().to_string(),
            updated_at: encode_time(now),
        })
    }

    pub fn into_domain(self) -> Result<PlayerSnapshot> {
        Ok(PlayerSnapshot {
            id: PlayerId::new(from_column(self.id)?),
            team: TeamId::new(from_column(self.team_id)?),
            web_name: self.web_name,
            position: Position::try_from(i64::from(self.position))?,
            price: Price::from_tenths(self.price),
            availability: Availability {
                status: PlayerStatus::from(self.status),
                news: self.news,
            },
        })
    }
}

/// Database row for a fixture.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = fixtures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FixtureRow {
    pub id: i32,
    pub gameweek: Option<i32>,
    pub home_team: i32,
    pub away_team: i32,
    pub kickoff_time: Option<String>,
    pub started: i32,
    pub finished: i32,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub minutes: i32,
}

impl FixtureRow {
    pub fn from_domain(fixture: &FixtureState) -> Result<Self> {
        Ok(Self {
            id: to_column(fixture.id.get())?,
            gameweek: fixture.gameweek.map(|gw| to_column(gw.get())).transpose()?,
            home_team: to_column(fixture.home_team.get())?,
            away_team: to_column(fixture.away_team.get())?,
            kickoff_time: fixture.kickoff_time.map(encode_time),
            started: flag(fixture.started),
            finished: flag(fixture.finished),
            home_score: fixture.home_score,
            away_score: fixture.away_score,
            minutes: fixture.minutes,
        })
    }

    pub fn into_domain(self) -> Result<FixtureState> {
        Ok(FixtureState {
            id: FixtureId::new(from_column(self.id)?),
            gameweek: self
                .gameweek
                .map(|gw| from_column(gw).map(GameweekId::new))
                .transpose()?,
            home_team: TeamId::new(from_column(self.home_team)?),
            away_team: TeamId::new(from_column(self.away_team)?),
            kickoff_time: self.kickoff_time.as_deref().map(decode_time).transpose()?,
            started: self.started != 0,
            finished: self.finished != 0,
            home_score: self.home_score,
            away_score: self.away_score,
            minutes: self.minutes,
        })
    }
}

/// Database row for a gameweek.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = gameweeks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameweekRow {
    pub id: i32,
    pub name: String,
    pub is_current: i32,
    pub finished: i32,
    pub data_checked: i32,
    pub processed: i32,
}

impl GameweekRow {
    pub fn from_domain(gameweek: &GameweekState) -> Result<Self> {
        Ok(Self {
            id: to_column(gameweek.id.get())?,
            name: gameweek.name.clone(),
            is_current: flag(gameweek.is_current),
            finished: flag(gameweek.finished),
            data_checked: flag(gameweek.data_checked),
            processed: flag(gameweek.processed),
        })
    }

    pub fn into_domain(self) -> Result<GameweekState> {
        Ok(GameweekState {
            id: GameweekId::new(from_column(self.id)?),
            name: self.name,
            is_current: self.is_current != 0,
            finished: self.finished != 0,
            data_checked: self.data_checked != 0,
            processed: self.processed != 0,
        })
    }
}

/// Database row for one (player, fixture, gameweek) stat line.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = stat_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatLineRow {
    pub player_id: i32,
    pub fixture_id: i32,
    pub gameweek: i32,
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
    pub updated_at: String,
}

impl StatLineRow {
    pub fn from_domain(line: &StatLine, now: DateTime<Utc>) -> Result<Self> {
        let c = &line.counters;
        Ok(Self {
            player_id: to_column(line.key.player.get())?,
            fixture_id: to_column(line.key.fixture.get())?,
            gameweek: to_column(line.key.gameweek.get())?,
            minutes: c.minutes,
            goals_scored: c.goals_scored,
            assists: c.assists,
            clean_sheets: c.clean_sheets,
            goals_conceded: c.goals_conceded,
            own_goals: c.own_goals,
            penalties_saved: c.penalties_saved,
            penalties_missed: c.penalties_missed,
            yellow_cards: c.yellow_cards,
            red_cards: c.red_cards,
            saves: c.saves,
            bonus: c.bonus,
            bps: c.bps,
            defensive_contribution: c.defensive_contribution,
            updated_at: encode_time(now),
        })
    }

    pub fn into_domain(self) -> Result<(StatKey, Counters)> {
        let key = StatKey {
            player: PlayerId::new(from_column(self.player_id)?),
            fixture: FixtureId::new(from_column(self.fixture_id)?),
            gameweek: GameweekId::new(from_column(self.gameweek)?),
        };
        let counters = Counters {
            minutes: self.minutes,
            goals_scored: self.goals_scored,
            assists: self.assists,
            clean_sheets: self.clean_sheets,
            goals_conceded: self.goals_conceded,
            own_goals: self.own_goals,
            penalties_saved: self.penalties_saved,
            penalties_missed: self.penalties_missed,
            yellow_cards: self.yellow_cards,
            red_cards: self.red_cards,
            saves: self.saves,
            bonus: self.bonus,
            bps: self.bps,
            defensive_contribution: self.defensive_contribution,
        };
        Ok((key, counters))
    }
}

/// Database row for an audited event (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = events)]
pub struct NewEventRow {
    pub kind: String,
    pub player_id: i32,
    pub gameweek: i32,
    pub old_value: String,
    pub new_value: String,
    pub points_change: i32,
    pub occurred_at: String,
    pub dispatched: i32,
}

impl NewEventRow {
    pub fn from_domain(event: &Event, dispatched: bool) -> Result<Self> {
        Ok(Self {
            kind: event.kind.label().to_string(),
            player_id: to_column(event.player_id.get())?,
            gameweek: to_column(event.gameweek.get())?,
            old_value: serde_json::to_string(&event.old_value)?,
            new_value: serde_json::to_string(&event.new_value)?,
            points_change: event.points_change,
            occurred_at: encode_time(event.timestamp),
            dispatched: flag(dispatched),
        })
    }
}

/// Database row for an audited event (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub id: Option<i32>,
    pub kind: String,
    pub player_id: i32,
    pub gameweek: i32,
    pub old_value: String,
    pub new_value: String,
    pub points_change: i32,
    pub occurred_at: String,
    pub dispatched: i32,
}

/// Database row for a monitoring run (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = monitoring_runs)]
pub struct NewRunRow {
    pub service_name: String,
    pub run_kind: String,
    pub monitors: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub records_processed: i32,
    pub changes_detected: i32,
    pub notifications_sent: i32,
    pub error_message: Option<String>,
}

impl From<&MonitoringRun> for NewRunRow {
    fn from(run: &MonitoringRun) -> Self {
        Self {
            service_name: run.service_name.clone(),
            run_kind: run.kind.as_str().to_string(),
            monitors: run.monitors_label(),
            status: run.status.as_str().to_string(),
            started_at: encode_time(run.started_at),
            finished_at: encode_time(run.finished_at),
            records_processed: count_column(run.records_processed),
            changes_detected: count_column(run.changes_detected),
            notifications_sent: count_column(run.notifications_sent),
            error_message: run.error_message.clone(),
        }
    }
}

/// Database row for a monitoring run (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = monitoring_runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RunRow {
    pub id: Option<i32>,
    pub service_name: String,
    pub run_kind: String,
    pub monitors: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub records_processed: i32,
    pub changes_detected: i32,
    pub notifications_sent: i32,
    pub error_message: Option<String>,
}

impl RunRow {
    pub fn into_domain(self) -> Result<MonitoringRun> {
        let monitors = self
            .monitors
            .split(',')
            .filter(|m| !m.is_empty())
            .map(|m| m.parse().map_err(Error::Parse))
            .collect::<Result<Vec<_>>>()?;
        Ok(MonitoringRun {
            service_name: self.service_name,
            kind: self.run_kind.parse().map_err(Error::Parse)?,
            monitors,
            status: self.status.parse().map_err(Error::Parse)?,
            started_at: decode_time(&self.started_at)?,
            finished_at: decode_time(&self.finished_at)?,
            records_processed: u32::try_from(self.records_processed).unwrap_or(0),
            changes_detected: u32::try_from(self.changes_detected).unwrap_or(0),
            notifications_sent: u32::try_from(self.notifications_sent).unwrap_or(0),
            error_message: self.error_message,
        })
    }
}

/// Database row for the single-row engine lock.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = engine_lock)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LockRow {
    pub id: i32,
    pub owner: String,
    pub heartbeat_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_times_sort_lexically() {
        let early = Utc.with_ymd_and_hms(2025, 9, 13, 9, 5, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 9, 13, 10, 0, 0).unwrap();
        assert!(encode_time(early) < encode_time(late));
        assert_eq!(decode_time(&encode_time(late)).unwrap(), late);
    }

    #[test]
    fn player_row_round_trips_status_and_news() {
        let player = PlayerSnapshot {
            id: PlayerId::new(328),
            team: TeamId::new(12),
            web_name: "Salah".into(),
            position: Position::Midfielder,
            price: Price::from_tenths(145),
            availability: Availability {
                status: PlayerStatus::Doubtful,
                news: "Knock - 75% chance of playing".into(),
            },
        };
        let row = PlayerRow::from_domain(&player, Utc::now()).unwrap();
        assert_eq!(row.position, 3);
        assert_eq!(row.status, "d");
        assert_eq!(row.into_domain().unwrap(), player);
    }

    #[test]
    fn run_row_rejects_unknown_monitor() {
        let row = RunRow {
            id: Some(1),
            service_name: "fplwatch".into(),
            run_kind: "monitor".into(),
            monitors: "live_performance,weekly".into(),
            status: "success".into(),
            started_at: encode_time(Utc::now()),
            finished_at: encode_time(Utc::now()),
            records_processed: 0,
            changes_detected: 0,
            notifications_sent: 0,
            error_message: None,
        };
        assert!(matches!(row.into_domain(), Err(Error::Parse(_))));
    }
}
