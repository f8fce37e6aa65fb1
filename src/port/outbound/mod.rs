//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's infrastructure dependencies: the
//! provider API, durable state, the advisory lock, time, and notifications.

pub mod clock;
pub mod fetcher;
pub mod lock;
pub mod notifier;
pub mod store;
