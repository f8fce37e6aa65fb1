//! Notifier port for event delivery.
//!
//! This module defines the trait the dispatcher side implements to receive
//! finished [`Event`]s. Formatting and delivery retries belong to the
//! implementation; the engine never waits on them during a cycle. Only
//! shutdown waits, through [`NotifierRegistry::close_all`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Event, EventValue};

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Slow delivery (HTTP) belongs on a spawned task
/// - `close` stops accepting events and returns once queued ones are handled
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);

    /// Finish queued deliveries. Events notified afterwards are dropped.
    async fn close(&self) {}
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: &Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Close every notifier, waiting at most `limit` for queued deliveries.
    ///
    /// Returns `false` if the limit elapsed first.
    pub async fn close_all(&self, limit: Duration) -> bool {
        let closing = async {
            for notifier in &self.notifiers {
                notifier.close().await;
            }
        };
        if tokio::time::timeout(limit, closing).await.is_ok() {
            true
        } else {
            warn!(
                seconds = limit.as_secs(),
                "Timed out waiting for notifications to be delivered"
            );
            false
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match (&event.old_value, &event.new_value) {
            (EventValue::Availability(old), EventValue::Availability(new)) => {
                info!(
                    kind = %event.kind,
                    player = %event.player_id,
                    gameweek = %event.gameweek,
                    old_status = old.status.code(),
                    new_status = new.status.code(),
                    news = %new.news,
                    "Status changed"
                );
            }
            (EventValue::Price(old), EventValue::Price(new)) => {
                info!(
                    kind = %event.kind,
                    player = %event.player_id,
                    gameweek = %event.gameweek,
                    old = %old,
                    new = %new,
                    "Price changed"
                );
            }
            (old, new) => {
                info!(
                    kind = %event.kind,
                    player = %event.player_id,
                    gameweek = %event.gameweek,
                    old = ?old.as_number(),
                    new = ?new.as_number(),
                    points = event.points_change,
                    "Player event"
                );
            }
        }
    }
}
