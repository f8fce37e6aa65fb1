//! Response shapes of the three FPL endpoints.
//!
//! Top-level lists are decoded as raw JSON values first so that one
//! malformed element only costs that element, not the whole response.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET bootstrap-static/`
#[derive(Debug, Deserialize)]
pub struct BootstrapResponse {
    pub elements: Vec<serde_json::Value>,
    pub events: Vec<serde_json::Value>,
}

/// One entry of `bootstrap-static/.elements`.
#[derive(Debug, Deserialize)]
pub struct ElementDto {
    pub id: i64,
    pub team: Option<u32>,
    pub web_name: Option<String>,
    pub element_type: Option<i64>,
    pub now_cost: Option<i32>,
    pub status: Option<String>,
    #[serde(default)]
    pub news: Option<String>,
}

/// One entry of `bootstrap-static/.events` (a gameweek).
#[derive(Debug, Deserialize)]
pub struct GameweekDto {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub data_checked: bool,
}

/// One entry of `GET fixtures/`.
#[derive(Debug, Deserialize)]
pub struct FixtureDto {
    pub id: u32,
    pub event: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    pub kickoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub finished: bool,
    pub team_h_score: Option<i32>,
    pub team_a_score: Option<i32>,
    #[serde(default)]
    pub minutes: i32,
}

/// `GET event/{gw}/live/`
#[derive(Debug, Deserialize)]
pub struct LiveResponse {
    pub elements: Vec<serde_json::Value>,
}

/// One player in the live response.
#[derive(Debug, Deserialize)]
pub struct LiveElementDto {
    pub id: u32,
    pub stats: LiveStatsDto,
    #[serde(default)]
    pub explain: Vec<ExplainDto>,
}

/// Gameweek totals for one player.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LiveStatsDto {
    pub minutes: i32,
    pub goals_scored: i32,
    pub assists: i32,
    pub clean_sheets: i32,
    pub goals_conceded: i32,
    pub own_goals: i32,
    pub penalties_saved: i32,
    pub penalties_missed: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub saves: i32,
    pub bonus: i32,
    pub bps: i32,
    pub defensive_contribution: i32,
}

/// Per-fixture points breakdown.
#[derive(Debug, Deserialize)]
pub struct ExplainDto {
    pub fixture: u32,
    #[serde(default)]
    pub stats: Vec<ExplainStatDto>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainStatDto {
    pub identifier: String,
    pub value: i32,
}
