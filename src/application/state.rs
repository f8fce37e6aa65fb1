//! Game state read from committed snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::GameState;
use crate::error::Result;
use crate::port::SnapshotStore;

/// Builds a [`GameState`] from the store. Pure read.
pub struct GameStateProvider {
    store: Arc<dyn SnapshotStore>,
}

impl GameStateProvider {
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// State as last committed.
    pub fn current(&self, now: DateTime<Utc>) -> Result<GameState> {
        Ok(GameState::new(
            now,
            self.store.load_fixtures()?,
            self.store.load_gameweeks()?,
        ))
    }
}
