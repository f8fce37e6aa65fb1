//! Notifier selection.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::adapter::outbound::notifier::WebhookConfig;
use crate::error::{ConfigError, Result};

const fn default_true() -> bool {
    true
}

/// `[notifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Log every dispatched event.
    #[serde(default = "default_true")]
    pub log: bool,
    /// POST events here when set. `FPLWATCH_WEBHOOK_URL` overrides it.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_max_attempts")]
    pub webhook_max_attempts: u32,
    #[serde(default = "default_webhook_backoff_ms")]
    pub webhook_backoff_ms: u64,
    #[serde(default = "default_webhook_timeout_ms")]
    pub webhook_timeout_ms: u64,
    /// How long shutdown waits for queued deliveries.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

const fn default_webhook_max_attempts() -> u32 {
    3
}

const fn default_webhook_backoff_ms() -> u64 {
    1000
}

const fn default_webhook_timeout_ms() -> u64 {
    5000
}

const fn default_drain_timeout_ms() -> u64 {
    30_000
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            log: default_true(),
            webhook_url: None,
            webhook_max_attempts: default_webhook_max_attempts(),
            webhook_backoff_ms: default_webhook_backoff_ms(),
            webhook_timeout_ms: default_webhook_timeout_ms(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

impl NotifierConfig {
    #[must_use]
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    /// Webhook settings, if a URL is configured.
    ///
    /// # Errors
    /// The URL does not parse or is not http(s).
    pub fn webhook(&self) -> Result<Option<WebhookConfig>> {
        let Some(raw) = self.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            field: "notifier.webhook_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "notifier.webhook_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }
            .into());
        }
        Ok(Some(WebhookConfig {
            url,
            max_attempts: self.webhook_max_attempts.max(1),
            backoff: Duration::from_millis(self.webhook_backoff_ms),
            timeout: Duration::from_millis(self.webhook_timeout_ms),
        }))
    }
}
