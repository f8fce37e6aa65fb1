//! JSON body posted for each event.
//!
//! Formatters downstream key on `type`; the remaining fields mirror
//! [`Event`] so nothing is lost in transit.

use serde::Serialize;

use crate::domain::Event;

/// Wire shape of a dispatched event.
#[derive(Debug, Serialize)]
pub struct EventPayload<'a> {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    /// Whether the event affects a player's points for the gameweek.
    pub performance: bool,
    #[serde(flatten)]
    pub event: &'a Event,
}

impl<'a> EventPayload<'a> {
    #[must_use]
    pub fn new(event: &'a Event) -> Self {
        Self {
            event_type: event.kind.label(),
            performance: event.kind.is_performance(),
            event,
        }
    }
}
