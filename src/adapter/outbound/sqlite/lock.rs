//! SQLite advisory lock.
//!
//! A single `engine_lock` row holds the owner and its last heartbeat. The
//! acquire is one conditional upsert, so two processes racing for a stale
//! lease cannot both win.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;

use super::database::connection::DbPool;
use super::database::model::encode_time;
use super::database::schema::engine_lock;
use crate::error::{Error, Result};
use crate::port::EngineLock;

const ACQUIRE_SQL: &str = "INSERT INTO engine_lock (id, owner, heartbeat_at) VALUES (1, ?, ?) \
     ON CONFLICT(id) DO UPDATE SET owner = excluded.owner, heartbeat_at = excluded.heartbeat_at \
     WHERE engine_lock.owner = excluded.owner OR engine_lock.heartbeat_at <= ?";

/// Lease stored in the `engine_lock` table.
pub struct SqliteEngineLock {
    pool: DbPool,
}

impl SqliteEngineLock {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl EngineLock for SqliteEngineLock {
    fn try_acquire(&self, owner: &str, now: DateTime<Utc>, ttl: Duration) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let affected = diesel::sql_query(ACQUIRE_SQL)
            .bind::<Text, _>(owner)
            .bind::<Text, _>(encode_time(now))
            .bind::<Text, _>(encode_time(now - ttl))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(affected == 1)
    }

    fn release(&self, owner: &str) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        diesel::delete(engine_lock::table.filter(engine_lock::owner.eq(owner)))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}
