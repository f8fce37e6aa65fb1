//! Cadence policies: when each monitor wants to run.

mod bonus;
mod live;
mod policy;
mod price;
mod registry;
mod status;

pub use bonus::FinalBonus;
pub use live::LivePerformance;
pub use policy::{CadencePolicy, Requirements};
pub use price::PriceWindow;
pub use registry::{CadenceIntervals, CadenceRegistry};
pub use status::StatusChange;
