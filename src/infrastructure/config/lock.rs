//! Engine lock settings.

use serde::Deserialize;

/// `[lock]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LockConfig {
    /// Lease owner name. `FPLWATCH_LOCK_OWNER` overrides it; when neither is
    /// set a random owner is generated per process.
    #[serde(default)]
    pub owner: Option<String>,
    /// A lease whose heartbeat is older than this may be taken over.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

const fn default_ttl_secs() -> u64 {
    300
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            owner: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl LockConfig {
    /// The configured owner, or a fresh `fplwatch-<uuid>`.
    #[must_use]
    pub fn owner(&self) -> String {
        self.owner
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| format!("fplwatch-{}", uuid::Uuid::new_v4()))
    }
}
