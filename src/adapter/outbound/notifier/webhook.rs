//! Webhook delivery.
//!
//! [`WebhookNotifier`] queues events on an unbounded channel and a
//! background worker POSTs each one as JSON. Delivery is retried a bounded
//! number of times on transport errors, 429 and 5xx; anything else is
//! dropped with a warning. The engine never waits on delivery; closing the
//! notifier drops the sender and waits for the worker to drain the queue.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client as HttpClient, StatusCode};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use super::payload::EventPayload;
use crate::domain::Event;
use crate::port::Notifier;

/// Configuration for the webhook notifier.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    /// Total delivery attempts per event, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further retry.
    pub backoff: Duration,
    pub timeout: Duration,
}

/// Notifier that POSTs events to a webhook.
pub struct WebhookNotifier {
    sender: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WebhookNotifier {
    /// Create the notifier and spawn its delivery worker.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        let worker = tokio::spawn(webhook_worker(http, config, receiver));
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn notify(&self, event: Event) {
        let delivered = self
            .sender
            .lock()
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok());
        if !delivered {
            warn!("Webhook notifier channel closed");
        }
    }

    async fn close(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Webhook notifier worker ended abnormally");
            }
        }
    }
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    Delivered,
    Retry,
    GiveUp,
}

pub(crate) fn classify(status: StatusCode) -> Attempt {
    if status.is_success() {
        Attempt::Delivered
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Attempt::Retry
    } else {
        Attempt::GiveUp
    }
}

pub(crate) fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1 << attempt.saturating_sub(1).min(6))
}

async fn webhook_worker(
    http: HttpClient,
    config: WebhookConfig,
    mut receiver: mpsc::UnboundedReceiver<Event>,
) {
    info!(url = %config.url, "Webhook notifier started");

    while let Some(event) = receiver.recv().await {
        deliver(&http, &config, &event).await;
    }

    info!("Webhook notifier worker shutting down");
}

async fn deliver(http: &HttpClient, config: &WebhookConfig, event: &Event) {
    let payload = EventPayload::new(event);
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let outcome = match http.post(config.url.clone()).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                let outcome = classify(status);
                if outcome != Attempt::Delivered {
                    warn!(status = status.as_u16(), attempt, kind = %event.kind, "Webhook rejected event");
                }
                outcome
            }
            Err(err) => {
                warn!(error = %err, attempt, kind = %event.kind, "Webhook request failed");
                Attempt::Retry
            }
        };

        match outcome {
            Attempt::Delivered => {
                debug!(kind = %event.kind, player = %event.player_id, "Webhook delivered");
                return;
            }
            Attempt::GiveUp => break,
            Attempt::Retry if attempt < max_attempts => {
                sleep(retry_delay(config.backoff, attempt)).await;
            }
            Attempt::Retry => {}
        }
    }

    error!(
        kind = %event.kind,
        player = %event.player_id,
        gameweek = %event.gameweek,
        "Dropping event after failed webhook delivery"
    );
}
