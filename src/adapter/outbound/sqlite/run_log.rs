//! SQLite run log implementation.

use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::{NewRunRow, RunRow};
use super::database::schema::monitoring_runs;
use crate::domain::MonitoringRun;
use crate::error::{Error, Result};
use crate::port::RunLog;

/// Append-only `monitoring_runs` table.
pub struct SqliteRunLog {
    pool: DbPool,
}

impl SqliteRunLog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RunLog for SqliteRunLog {
    fn record_run(&self, run: &MonitoringRun) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        diesel::insert_into(monitoring_runs::table)
            .values(&NewRunRow::from(run))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn recent_runs(&self, limit: usize) -> Result<Vec<MonitoringRun>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let rows: Vec<RunRow> = monitoring_runs::table
            .order(monitoring_runs::id.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(RunRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(RunRow::into_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::{MonitorKind, RunKind, RunStatus};
    use crate::testkit::domain::base_time;

    fn run(records: u32, status: RunStatus) -> MonitoringRun {
        MonitoringRun {
            service_name: "fplwatch".into(),
            kind: RunKind::Monitor,
            monitors: vec![MonitorKind::LivePerformance, MonitorKind::StatusChange],
            status,
            started_at: base_time(),
            finished_at: base_time() + chrono::Duration::seconds(2),
            records_processed: records,
            changes_detected: 1,
            notifications_sent: 1,
            error_message: (status == RunStatus::Failed).then(|| "provider returned HTTP 503".into()),
        }
    }

    #[test]
    fn recent_runs_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir.path().join("runs.db").to_string_lossy()).unwrap();
        let log = SqliteRunLog::new(pool);

        log.record_run(&run(10, RunStatus::Success)).unwrap();
        log.record_run(&run(0, RunStatus::Failed)).unwrap();

        let runs = log.recent_runs(5).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert_eq!(runs[1], run(10, RunStatus::Success));
        assert_eq!(log.recent_runs(1).unwrap().len(), 1);
    }
}
