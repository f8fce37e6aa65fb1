//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for delivery backends. The log
//! notifier lives next to the port; this module adds remote delivery.

pub mod payload;
pub mod webhook;

pub use webhook::{WebhookConfig, WebhookNotifier};

#[cfg(test)]
mod tests;
