//! Data source port.
//!
//! Three idempotent reads against the external provider. A call either
//! returns a complete result or a [`FetchError`]; it never fills a result
//! partially and never touches shared state.

use async_trait::async_trait;

use crate::domain::{FixtureState, GameweekId, GameweekState, LiveStats, PlayerSnapshot};
use crate::error::{DataIntegrityError, FetchError};

/// Global player and gameweek metadata.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    pub players: Vec<PlayerSnapshot>,
    /// Gameweek lifecycle flags. `processed` is always false here; only the
    /// store knows whether bonus was emitted.
    pub gameweeks: Vec<GameweekState>,
    /// Entities dropped during conversion, for logging.
    pub skipped: Vec<DataIntegrityError>,
}

/// Port for fetching provider snapshots.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Players, prices, availability and gameweek flags.
    async fn fetch_bootstrap(&self) -> Result<Bootstrap, FetchError>;

    /// The full fixture list.
    async fn fetch_fixtures(&self) -> Result<Vec<FixtureState>, FetchError>;

    /// Per-player cumulative counters for one gameweek.
    async fn fetch_live(&self, gameweek: GameweekId) -> Result<Vec<LiveStats>, FetchError>;

    /// Name used in logs.
    fn source_name(&self) -> &'static str;
}
