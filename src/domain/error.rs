//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_from`/`try_new` constructors that
//! validate provider-supplied codes and configured windows.
//!
//! # Examples
//!
//! ```
//! use fplwatch::domain::error::DomainError;
//! use fplwatch::domain::Position;
//!
//! let result = Position::try_from(7);
//! assert!(matches!(result, Err(DomainError::UnknownPosition { code: 7 })));
//! ```

use chrono::NaiveTime;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provider's `element_type` did not map to a playing position.
    #[error("unknown position code {code}")]
    UnknownPosition {
        /// The code that was provided.
        code: i64,
    },

    /// A daily window must start strictly before it ends.
    #[error("window start {start} must be before end {end}")]
    InvertedWindow {
        /// Inclusive start of the window.
        start: NaiveTime,
        /// Exclusive end of the window.
        end: NaiveTime,
    },

    /// Counters reported by the provider are never negative.
    #[error("negative counter {field} = {value}")]
    NegativeCounter {
        /// Name of the counter.
        field: &'static str,
        /// The offending value.
        value: i64,
    },
}
