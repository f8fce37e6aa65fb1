//! Domain identifier types.
//!
//! The provider keys everything by small positive integers. Wrapping them
//! keeps a fixture id from being passed where a player id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw provider id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// The raw provider id.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                i64::from(id.0)
            }
        }
    };
}

numeric_id!(
    /// Stable external player id (`element.id` / `fpl_id`).
    PlayerId
);
numeric_id!(
    /// Fixture id as assigned by the provider.
    FixtureId
);
numeric_id!(
    /// Gameweek (`event`) number.
    GameweekId
);
numeric_id!(
    /// Team id as assigned by the provider.
    TeamId
);
