//! Provider-agnostic domain types and the pure scoring rules.

pub mod error;
pub mod event;
pub mod fixture;
pub mod game_state;
pub mod id;
pub mod player;
pub mod position;
pub mod run;
pub mod scoring;
pub mod stats;
pub mod window;

pub use error::DomainError;
pub use event::{CardColour, Event, EventKind, EventValue};
pub use fixture::{FixtureState, GameweekState};
pub use game_state::GameState;
pub use id::{FixtureId, GameweekId, PlayerId, TeamId};
pub use player::{Availability, PlayerSnapshot, PlayerStatus, Price};
pub use position::Position;
pub use run::{MonitorKind, MonitoringRun, RunKind, RunStatus};
pub use scoring::{EventContext, ScoringEngine, ScoringTable};
pub use stats::{Counters, LiveStats, StatKey, StatLine};
pub use window::{in_window, DailyWindow};
