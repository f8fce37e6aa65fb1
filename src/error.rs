use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
///
/// Every variant is fatal at startup: the engine refuses to run with
/// ambiguous cadence rules.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reaching the external data provider.
///
/// A fetch error never carries partial data; the cycle that hit it is
/// abandoned and retried on the next scheduled tick.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// A single entity carried a missing or malformed field.
///
/// The entity is skipped for the current cycle; other entities proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} {id}: {reason}")]
pub struct DataIntegrityError {
    pub entity: &'static str,
    pub id: i64,
    pub reason: String,
}

impl DataIntegrityError {
    pub fn new(entity: &'static str, id: impl Into<i64>, reason: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    /// The engine lock changed hands before a commit.
    #[error("engine lock is held by '{0}'")]
    LockLost(String),

    /// A single-shot cycle did not complete.
    #[error("cycle failed: {0}")]
    Cycle(String),
}

impl Error {
    /// True for failures writing or reading durable state.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Connection(_))
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
