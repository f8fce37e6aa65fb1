//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`PlayerSnapshot`],
//! [`FixtureState`], [`GameweekState`] and [`LiveStats`] so tests focus on
//! assertions rather than construction boilerplate.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Availability, Counters, FixtureId, FixtureState, GameweekId, GameweekState, LiveStats,
    PlayerId, PlayerSnapshot, PlayerStatus, Position, Price, TeamId,
};

/// A fixed reference instant: Saturday 13 September 2025, 14:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 13, 14, 0, 0)
        .single()
        .expect("valid base time")
}

/// An available player with no news.
pub fn player(id: u32, team: u32, position: Position, price_tenths: i32) -> PlayerSnapshot {
    PlayerSnapshot {
        id: PlayerId::new(id),
        team: TeamId::new(team),
        web_name: format!("Player{id}"),
        position,
        price: Price::from_tenths(price_tenths),
        availability: Availability {
            status: PlayerStatus::Available,
            news: String::new(),
        },
    }
}

/// The same player with a different availability.
pub fn with_status(mut player: PlayerSnapshot, status: PlayerStatus, news: &str) -> PlayerSnapshot {
    player.availability = Availability {
        status,
        news: news.to_string(),
    };
    player
}

/// The same player at a different price.
pub fn with_price(mut player: PlayerSnapshot, price_tenths: i32) -> PlayerSnapshot {
    player.price = Price::from_tenths(price_tenths);
    player
}

/// A fixture that has kicked off and is still in play.
pub fn live_fixture(id: u32, gameweek: u32, home: u32, away: u32, kickoff: DateTime<Utc>) -> FixtureState {
    FixtureState {
        id: FixtureId::new(id),
        gameweek: Some(GameweekId::new(gameweek)),
        home_team: TeamId::new(home),
        away_team: TeamId::new(away),
        kickoff_time: Some(kickoff),
        started: true,
        finished: false,
        home_score: Some(0),
        away_score: Some(0),
        minutes: 1,
    }
}

/// A fixture that has not kicked off.
pub fn scheduled_fixture(id: u32, gameweek: u32, home: u32, away: u32, kickoff: DateTime<Utc>) -> FixtureState {
    FixtureState {
        started: false,
        home_score: None,
        away_score: None,
        minutes: 0,
        ..live_fixture(id, gameweek, home, away, kickoff)
    }
}

/// A fixture that has been played to full time.
pub fn finished_fixture(id: u32, gameweek: u32, home: u32, away: u32, kickoff: DateTime<Utc>) -> FixtureState {
    FixtureState {
        finished: true,
        minutes: 90,
        ..live_fixture(id, gameweek, home, away, kickoff)
    }
}

/// A gameweek that is in progress.
pub fn open_gameweek(id: u32) -> GameweekState {
    GameweekState {
        id: GameweekId::new(id),
        name: format!("Gameweek {id}"),
        is_current: true,
        finished: false,
        data_checked: false,
        processed: false,
    }
}

/// A gameweek the provider has finished and data-checked.
pub fn checked_gameweek(id: u32) -> GameweekState {
    GameweekState {
        finished: true,
        data_checked: true,
        ..open_gameweek(id)
    }
}

/// A live-stats row pinned to a fixture.
pub fn live_row(player: u32, gameweek: u32, fixture: u32, counters: Counters) -> LiveStats {
    LiveStats {
        player: PlayerId::new(player),
        gameweek: GameweekId::new(gameweek),
        fixture: Some(FixtureId::new(fixture)),
        counters,
    }
}

/// Counters for a player on the pitch for `minutes` with nothing else.
pub fn played(minutes: i32) -> Counters {
    Counters {
        minutes,
        ..Counters::default()
    }
}
