//! Infrastructure configuration modules.

pub mod cadence;
pub mod lock;
pub mod logging;
pub mod notifier;
pub mod settings;
pub mod window;

pub use settings::Config;
