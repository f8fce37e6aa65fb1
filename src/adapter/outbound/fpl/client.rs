//! FPL REST API client.
//!
//! Three public, unauthenticated endpoints:
//! - `bootstrap-static/` - players, prices, availability, gameweek flags
//! - `fixtures/` - the season's fixture list
//! - `event/{gw}/live/` - per-player counters for one gameweek

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::convert;
use super::dto::{BootstrapResponse, LiveResponse};
use super::settings::FplSourceConfig;
use crate::domain::{FixtureState, GameweekId, LiveStats};
use crate::error::FetchError;
use crate::port::{Bootstrap, DataFetcher};

/// HTTP client for the FPL API.
pub struct FplClient {
    http: HttpClient,
    base_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl FplClient {
    #[must_use]
    pub fn from_config(config: &FplSourceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            match self.get_once(url).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) if attempt < max_attempts && Self::should_retry(&err) => {
                    self.backoff(attempt, max_attempts, &err).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn should_retry(err: &FetchError) -> bool {
        match err {
            FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Decode { .. } => false,
        }
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &FetchError) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

#[async_trait]
impl DataFetcher for FplClient {
    async fn fetch_bootstrap(&self) -> Result<Bootstrap, FetchError> {
        let response: BootstrapResponse = self.get_with_retry(&self.url("bootstrap-static/")).await?;

        let mut bootstrap = Bootstrap::default();
        for value in response.elements {
            match convert::player(value) {
                Ok(player) => bootstrap.players.push(player),
                Err(skipped) => bootstrap.skipped.push(skipped),
            }
        }
        for value in response.events {
            match convert::gameweek(value) {
                Ok(gameweek) => bootstrap.gameweeks.push(gameweek),
                Err(skipped) => bootstrap.skipped.push(skipped),
            }
        }

        debug!(
            players = bootstrap.players.len(),
            gameweeks = bootstrap.gameweeks.len(),
            skipped = bootstrap.skipped.len(),
            "Fetched bootstrap"
        );
        Ok(bootstrap)
    }

    async fn fetch_fixtures(&self) -> Result<Vec<FixtureState>, FetchError> {
        let values: Vec<serde_json::Value> = self.get_with_retry(&self.url("fixtures/")).await?;
        let mut fixtures = Vec::with_capacity(values.len());
        for value in values {
            match convert::fixture(value) {
                Ok(fixture) => fixtures.push(fixture),
                Err(skipped) => {
                    warn!(entity = skipped.entity, id = skipped.id, reason = %skipped.reason, "Skipping malformed entity");
                }
            }
        }
        debug!(fixtures = fixtures.len(), "Fetched fixtures");
        Ok(fixtures)
    }

    async fn fetch_live(&self, gameweek: GameweekId) -> Result<Vec<LiveStats>, FetchError> {
        let url = self.url(&format!("event/{gameweek}/live/"));
        let response: LiveResponse = self.get_with_retry(&url).await?;
        let mut rows = Vec::with_capacity(response.elements.len());
        for value in response.elements {
            match convert::live(value, gameweek) {
                Ok(mut player_rows) => rows.append(&mut player_rows),
                Err(skipped) => {
                    warn!(entity = skipped.entity, id = skipped.id, reason = %skipped.reason, "Skipping malformed entity");
                }
            }
        }
        Ok(rows)
    }

    fn source_name(&self) -> &'static str {
        "fpl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> FplClient {
        FplClient::from_config(&FplSourceConfig {
            base_url: base_url.into(),
            ..FplSourceConfig::default()
        })
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = client("https://fantasy.premierleague.com/api/");
        assert_eq!(
            client.url("event/5/live/"),
            "https://fantasy.premierleague.com/api/event/5/live/"
        );
    }

    #[test]
    fn retries_server_errors_only() {
        let status = |status| FetchError::Status {
            url: "u".into(),
            status,
        };
        assert!(FplClient::should_retry(&status(503)));
        assert!(FplClient::should_retry(&status(429)));
        assert!(!FplClient::should_retry(&status(404)));
        assert!(!FplClient::should_retry(&FetchError::Decode {
            url: "u".into(),
            reason: "eof".into()
        }));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = FplClient::from_config(&FplSourceConfig {
            base_url: "http://127.0.0.1:9".into(),
            retry_max_attempts: 1,
            connect_timeout_ms: 200,
            timeout_ms: 500,
            ..FplSourceConfig::default()
        });
        let err = client.fetch_fixtures().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
