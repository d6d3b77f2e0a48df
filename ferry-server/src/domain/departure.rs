//! Query-time departure types.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{FerryTime, Notice, RouteId, StopId};

/// What the requested time means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Leave at or after the requested time.
    #[default]
    Depart,
    /// Arrive at or before the requested time.
    Arrival,
    /// Leave at or after the current time.
    Now,
}

/// Inclusion predicate and result ordering for one [`TimeMode`].
#[derive(Clone, Copy)]
pub struct ModeRules {
    /// Whether a departure satisfies the requested time.
    pub admits: fn(&DepartureRecord, NaiveDateTime) -> bool,
    /// Result ordering.
    pub order: fn(&DepartureRecord, &DepartureRecord) -> Ordering,
}

impl TimeMode {
    /// The filter and sort order this mode implies.
    pub fn rules(self) -> ModeRules {
        match self {
            TimeMode::Depart | TimeMode::Now => ModeRules {
                admits: |record, requested| {
                    record.planned_departure.to_datetime() >= requested
                },
                order: |a, b| a.planned_departure.cmp(&b.planned_departure),
            },
            TimeMode::Arrival => ModeRules {
                admits: |record, requested| record.arrival_time.to_datetime() <= requested,
                order: |a, b| b.arrival_time.cmp(&a.arrival_time),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeMode::Depart => "depart",
            TimeMode::Arrival => "arrival",
            TimeMode::Now => "now",
        }
    }
}

/// Error returned when parsing an unknown time mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time mode: {0} (expected depart, arrival or now)")]
pub struct InvalidTimeMode(String);

impl FromStr for TimeMode {
    type Err = InvalidTimeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "depart" | "departure" => Ok(TimeMode::Depart),
            "arrival" | "arrive" => Ok(TimeMode::Arrival),
            "now" => Ok(TimeMode::Now),
            _ => Err(InvalidTimeMode(s.to_string())),
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete sailing between the queried stops.
///
/// Produced by a departure query and discarded once the response is built.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRecord {
    pub route: RouteId,
    pub route_number: String,
    pub from: StopId,
    pub to: StopId,
    pub planned_departure: FerryTime,
    pub arrival_time: FerryTime,
    /// True for sailings added by an EXTRA exception.
    pub is_extra: bool,
    /// Minutes added by a DELAYED exception, if one applied.
    pub delay_minutes: Option<u32>,
    pub notice: Option<Notice>,
}

impl DepartureRecord {
    /// Time on board between the two stops.
    pub fn duration(&self) -> Duration {
        self.arrival_time
            .signed_duration_since(self.planned_departure)
    }
}
