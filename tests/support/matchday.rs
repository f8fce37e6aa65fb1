//! A one-fixture gameweek: team 1 (striker) hosts team 2 (keeper).

use chrono::{DateTime, Duration, Utc};
use fplwatch::domain::{Counters, Position};
use fplwatch::testkit::domain::{
    base_time, checked_gameweek, finished_fixture, live_fixture, live_row, open_gameweek, played,
    player,
};
use fplwatch::testkit::fetcher::ScriptedFetcher;

pub const GAMEWEEK: u32 = 4;
pub const FIXTURE: u32 = 1;
pub const STRIKER: u32 = 10;
pub const KEEPER: u32 = 20;

pub fn kickoff() -> DateTime<Utc> {
    base_time() - Duration::minutes(30)
}

/// Both players on the pitch, nothing else happened yet.
pub fn quiet() -> (Counters, Counters) {
    (played(30), played(30))
}

/// Script an in-play match with the given counters.
pub fn script_live(fetcher: &ScriptedFetcher, striker: Counters, keeper: Counters) {
    fetcher.set_players(vec![
        player(STRIKER, 1, Position::Forward, 80),
        player(KEEPER, 2, Position::Goalkeeper, 45),
    ]);
    fetcher.set_gameweeks(vec![open_gameweek(GAMEWEEK)]);
    fetcher.set_fixtures(vec![live_fixture(FIXTURE, GAMEWEEK, 1, 2, kickoff())]);
    set_rows(fetcher, striker, keeper);
}

/// Script the match over and the gameweek data-checked.
pub fn script_full_time(fetcher: &ScriptedFetcher, striker: Counters, keeper: Counters) {
    fetcher.set_gameweeks(vec![checked_gameweek(GAMEWEEK)]);
    fetcher.set_fixtures(vec![finished_fixture(FIXTURE, GAMEWEEK, 1, 2, kickoff())]);
    set_rows(fetcher, striker, keeper);
}

fn set_rows(fetcher: &ScriptedFetcher, striker: Counters, keeper: Counters) {
    fetcher.set_live(
        GAMEWEEK,
        vec![
            live_row(STRIKER, GAMEWEEK, FIXTURE, striker),
            live_row(KEEPER, GAMEWEEK, FIXTURE, keeper),
        ],
    );
}

pub fn scored(minutes: i32, goals: i32) -> Counters {
    Counters {
        goals_scored: goals,
        ..played(minutes)
    }
}

pub fn with_bonus(counters: Counters, bonus: i32) -> Counters {
    Counters { bonus, ..counters }
}
