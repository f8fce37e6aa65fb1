//! SQLite snapshot store implementation.
//!
//! Holds the last committed provider state and the event audit trail. A
//! cycle's writes land in one `BEGIN IMMEDIATE` transaction.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;

use super::database::connection::DbPool;
use super::database::model::{
    to_column, EventRow, FixtureRow, GameweekRow, NewEventRow, PlayerRow, StatLineRow,
};
use super::database::schema::{engine_lock, events, fixtures, gameweeks, players, stat_lines};
use crate::domain::{
    Counters, EventKind, FixtureState, GameweekId, GameweekState, PlayerId, PlayerSnapshot,
    StatKey,
};
use crate::error::{Error, Result};
use crate::port::{CommitOutcome, CycleCommit, SnapshotStore};

/// SQLite-backed snapshot store.
pub struct SqliteSnapshotStore {
    pool: DbPool,
}

impl SqliteSnapshotStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    /// Most recent audited events first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<EventRow>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(events::table
            .order(events::id.desc())
            .limit(limit)
            .select(EventRow::as_select())
            .load(&mut conn)?)
    }

    fn write(conn: &mut SqliteConnection, commit: CycleCommit) -> Result<CommitOutcome> {
        if let Some(owner) = &commit.lock_owner {
            let holder: Option<String> = engine_lock::table
                .select(engine_lock::owner)
                .first(conn)
                .optional()?;
            if holder.as_deref() != Some(owner.as_str()) {
                return Err(Error::LockLost(holder.unwrap_or_default()));
            }
        }

        for player in &commit.players {
            diesel::replace_into(players::table)
                .values(&PlayerRow::from_domain(player, commit.at)?)
                .execute(conn)?;
        }

        for fixture in &commit.fixtures {
            diesel::replace_into(fixtures::table)
                .values(&FixtureRow::from_domain(fixture)?)
                .execute(conn)?;
        }

        // `processed` is only ever set by the conditional update below.
        for gameweek in &commit.gameweeks {
            diesel::insert_into(gameweeks::table)
                .values(&GameweekRow::from_domain(gameweek)?)
                .on_conflict(gameweeks::id)
                .do_update()
                .set((
                    gameweeks::name.eq(excluded(gameweeks::name)),
                    gameweeks::is_current.eq(excluded(gameweeks::is_current)),
                    gameweeks::finished.eq(excluded(gameweeks::finished)),
                    gameweeks::data_checked.eq(excluded(gameweeks::data_checked)),
                ))
                .execute(conn)?;
        }

        for line in &commit.stat_lines {
            diesel::replace_into(stat_lines::table)
                .values(&StatLineRow::from_domain(line, commit.at)?)
                .execute(conn)?;
        }

        let mut finalized = Vec::new();
        let mut lost = Vec::new();
        for gameweek in &commit.finalize {
            let claimed = diesel::update(
                gameweeks::table
                    .filter(gameweeks::id.eq(to_column(gameweek.get())?))
                    .filter(gameweeks::processed.eq(0)),
            )
            .set(gameweeks::processed.eq(1))
            .execute(conn)?;
            if claimed == 1 {
                finalized.push(*gameweek);
            } else {
                lost.push(*gameweek);
            }
        }

        let events: Vec<_> = commit
            .events
            .into_iter()
            .filter(|e| !(e.kind == EventKind::Bonus && lost.contains(&e.gameweek)))
            .collect();

        for event in &events {
            diesel::insert_into(events::table)
                .values(&NewEventRow::from_domain(event, commit.dispatched)?)
                .execute(conn)?;
        }

        Ok(CommitOutcome { events, finalized })
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load_players(&self) -> Result<HashMap<PlayerId, PlayerSnapshot>> {
        let mut conn = self.conn()?;
        let rows: Vec<PlayerRow> = players::table
            .select(PlayerRow::as_select())
            .load(&mut conn)?;
        rows.into_iter()
            .map(|row| row.into_domain().map(|p| (p.id, p)))
            .collect()
    }

    fn load_fixtures(&self) -> Result<Vec<FixtureState>> {
        let mut conn = self.conn()?;
        let rows: Vec<FixtureRow> = fixtures::table
            .order(fixtures::id.asc())
            .select(FixtureRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(FixtureRow::into_domain).collect()
    }

    fn load_gameweeks(&self) -> Result<Vec<GameweekState>> {
        let mut conn = self.conn()?;
        let rows: Vec<GameweekRow> = gameweeks::table
            .order(gameweeks::id.asc())
            .select(GameweekRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(GameweekRow::into_domain).collect()
    }

    fn load_stat_lines(&self, gameweeks: &[GameweekId]) -> Result<HashMap<StatKey, Counters>> {
        let ids = gameweeks
            .iter()
            .map(|gw| to_column(gw.get()))
            .collect::<Result<Vec<_>>>()?;
        let mut conn = self.conn()?;
        let rows: Vec<StatLineRow> = stat_lines::table
            .filter(stat_lines::gameweek.eq_any(ids))
            .select(StatLineRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(StatLineRow::into_domain).collect()
    }

    fn commit(&self, commit: CycleCommit) -> Result<CommitOutcome> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, Error, _>(|conn| Self::write(conn, commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::{Event, FixtureId, Position, StatLine};
    use crate::testkit::domain::{base_time, checked_gameweek, open_gameweek, played, player};

    fn store() -> (tempfile::TempDir, SqliteSnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let pool = open(&path.to_string_lossy()).unwrap();
        (dir, SqliteSnapshotStore::new(pool))
    }

    fn bonus(gameweek: u32) -> Event {
        Event::count(
            EventKind::Bonus,
            PlayerId::new(1),
            GameweekId::new(gameweek),
            0,
            3,
            3,
            base_time(),
        )
    }

    #[test]
    fn commit_round_trips_snapshots() {
        let (_dir, store) = store();
        let line = StatLine::new(
            PlayerId::new(1),
            FixtureId::new(10),
            GameweekId::new(4),
            played(90),
        );
        store
            .commit(CycleCommit {
                players: vec![player(1, 3, Position::Defender, 45)],
                gameweeks: vec![open_gameweek(4)],
                stat_lines: vec![line],
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();

        assert_eq!(store.load_players().unwrap().len(), 1);
        assert_eq!(store.load_gameweeks().unwrap(), vec![open_gameweek(4)]);
        let lines = store.load_stat_lines(&[GameweekId::new(4)]).unwrap();
        assert_eq!(lines.get(&line.key), Some(&played(90)));
        assert!(store.load_stat_lines(&[GameweekId::new(5)]).unwrap().is_empty());
    }

    #[test]
    fn finalize_is_check_and_set() {
        let (_dir, store) = store();
        let first = store
            .commit(CycleCommit {
                gameweeks: vec![checked_gameweek(4)],
                finalize: vec![GameweekId::new(4)],
                events: vec![bonus(4)],
                dispatched: true,
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();
        assert_eq!(first.finalized, vec![GameweekId::new(4)]);
        assert_eq!(first.events.len(), 1);

        let second = store
            .commit(CycleCommit {
                gameweeks: vec![checked_gameweek(4)],
                finalize: vec![GameweekId::new(4)],
                events: vec![bonus(4)],
                dispatched: true,
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();
        assert!(second.finalized.is_empty());
        assert!(second.events.is_empty());
        assert!(store.load_gameweeks().unwrap()[0].processed);
        assert_eq!(store.recent_events(10).unwrap().len(), 1);
    }

    #[test]
    fn gameweek_upsert_never_clears_processed() {
        let (_dir, store) = store();
        store
            .commit(CycleCommit {
                gameweeks: vec![checked_gameweek(4)],
                finalize: vec![GameweekId::new(4)],
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();
        store
            .commit(CycleCommit {
                gameweeks: vec![checked_gameweek(4)],
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();
        assert!(store.load_gameweeks().unwrap()[0].processed);
    }

    #[test]
    fn muted_events_are_audited_as_not_dispatched() {
        let (_dir, store) = store();
        let event = Event::count(
            EventKind::Goal,
            PlayerId::new(1),
            GameweekId::new(4),
            0,
            1,
            5,
            base_time(),
        );
        store
            .commit(CycleCommit {
                events: vec![event],
                dispatched: false,
                at: base_time(),
                ..CycleCommit::default()
            })
            .unwrap();
        let audited = store.recent_events(1).unwrap();
        assert_eq!(audited[0].kind, "goal");
        assert_eq!(audited[0].dispatched, 0);
    }

    #[test]
    fn commit_is_refused_after_lock_changes_hands() {
        use crate::adapter::outbound::sqlite::SqliteEngineLock;
        use crate::port::EngineLock;

        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir.path().join("fenced.db").to_string_lossy()).unwrap();
        let store = SqliteSnapshotStore::new(pool.clone());
        let lock = SqliteEngineLock::new(pool);
        let ttl = chrono::Duration::seconds(300);

        assert!(lock.try_acquire("a", base_time(), ttl).unwrap());
        let fenced = |owner: &str| CycleCommit {
            gameweeks: vec![open_gameweek(4)],
            at: base_time(),
            lock_owner: Some(owner.to_string()),
            ..CycleCommit::default()
        };
        store.commit(fenced("a")).unwrap();

        let later = base_time() + chrono::Duration::seconds(301);
        assert!(lock.try_acquire("b", later, ttl).unwrap());

        let err = store.commit(fenced("a")).unwrap_err();
        assert!(matches!(err, Error::LockLost(ref holder) if holder == "b"));
        store.commit(fenced("b")).unwrap();
    }
}
