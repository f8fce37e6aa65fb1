//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the engine's cycle: pick due monitors, fetch, diff,
//! persist, dispatch, sleep.

pub mod cadence;
pub mod cycle;
pub mod diff;
pub mod scheduler;
pub mod state;

pub use cycle::{CycleEngine, CycleInput, CycleReport};
pub use scheduler::{Scheduler, SchedulerPorts, SchedulerSettings, SchedulerTiming};
