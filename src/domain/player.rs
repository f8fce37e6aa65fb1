//! Player metadata snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{PlayerId, TeamId};
use super::position::Position;

/// Player price in integer tenths of the game currency (55 = 5.5m).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i32);

impl Price {
    #[must_use]
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    #[must_use]
    pub const fn tenths(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{}m", abs / 10, abs % 10)
    }
}

/// Provider availability code.
///
/// Unknown codes are preserved verbatim so that a new code still compares
/// unequal to the previous one and produces a status event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerStatus {
    Available,
    Doubtful,
    Injured,
    Suspended,
    Unavailable,
    NotInSquad,
    Other(String),
}

impl PlayerStatus {
    /// The provider's one-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            PlayerStatus::Available => "a",
            PlayerStatus::Doubtful => "d",
            PlayerStatus::Injured => "i",
            PlayerStatus::Suspended => "s",
            PlayerStatus::Unavailable => "u",
            PlayerStatus::NotInSquad => "n",
            PlayerStatus::Other(code) => code,
        }
    }

    /// Human-readable description for formatters.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            PlayerStatus::Available => "Available",
            PlayerStatus::Doubtful => "Doubtful",
            PlayerStatus::Injured => "Injured",
            PlayerStatus::Suspended => "Suspended",
            PlayerStatus::Unavailable => "Unavailable",
            PlayerStatus::NotInSquad => "Not in squad",
            PlayerStatus::Other(code) => code,
        }
    }
}

impl From<&str> for PlayerStatus {
    fn from(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "a" => PlayerStatus::Available,
            "d" => PlayerStatus::Doubtful,
            "i" => PlayerStatus::Injured,
            "s" => PlayerStatus::Suspended,
            "u" => PlayerStatus::Unavailable,
            "n" => PlayerStatus::NotInSquad,
            other => PlayerStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PlayerStatus {
    fn from(code: String) -> Self {
        PlayerStatus::from(code.as_str())
    }
}

impl From<PlayerStatus> for String {
    fn from(status: PlayerStatus) -> Self {
        status.code().to_string()
    }
}

/// Status code plus free-text news, the unit compared for status events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub status: PlayerStatus,
    pub news: String,
}

/// Last observed metadata for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub team: TeamId,
    pub web_name: String,
    pub position: Position,
    pub price: Price,
    pub availability: Availability,
}

impl PlayerSnapshot {
    #[must_use]
    pub fn status(&self) -> &PlayerStatus {
        &self.availability.status
    }

    #[must_use]
    pub fn news(&self) -> &str {
        &self.availability.news
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formats_as_millions() {
        assert_eq!(Price::from_tenths(55).to_string(), "5.5m");
        assert_eq!(Price::from_tenths(130).to_string(), "13.0m");
        assert_eq!(Price::from_tenths(-1).to_string(), "-0.1m");
    }

    #[test]
    fn status_codes_decode() {
        assert_eq!(PlayerStatus::from("a"), PlayerStatus::Available);
        assert_eq!(PlayerStatus::from("I"), PlayerStatus::Injured);
        assert_eq!(
            PlayerStatus::from("x"),
            PlayerStatus::Other("x".to_string())
        );
        assert_eq!(PlayerStatus::from("x").code(), "x");
    }

    #[test]
    fn status_serializes_as_code() {
        let json = serde_json::to_string(&PlayerStatus::Doubtful).unwrap();
        assert_eq!(json, "\"d\"");
        let back: PlayerStatus = serde_json::from_str("\"s\"").unwrap();
        assert_eq!(back, PlayerStatus::Suspended);
    }
}
