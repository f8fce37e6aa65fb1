use std::path::PathBuf;

use fplwatch::adapter::outbound::sqlite::{open, DbPool};
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
///
/// The directory (and the database in it) is removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("fplwatch-{name}.db"));
        let pool = open(&path.to_string_lossy()).expect("open sqlite database");
        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
