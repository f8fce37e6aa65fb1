//! Fantasy Premier League data source.

pub mod client;
pub mod convert;
pub mod dto;
pub mod settings;

pub use client::FplClient;
pub use settings::FplSourceConfig;
