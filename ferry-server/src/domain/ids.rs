//! Identity types for reference data.
//!
//! Every entity in the timetable store is keyed by a small integer. Each
//! entity gets its own newtype so a stop id can never be passed where a route
//! id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw numeric identifier.
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Identifies a ferry stop (pier, terminal or harbour).
    StopId
);
id_type!(
    /// Identifies a route.
    RouteId
);
id_type!(
    /// Identifies a timetable season.
    SeasonId
);
id_type!(
    /// Identifies a recurring frequency pattern.
    FrequencyId
);
id_type!(
    /// Identifies a schedule exception.
    ExceptionId
);
id_type!(
    /// Identifies a passenger notice attached to exceptions.
    NoticeId
);
