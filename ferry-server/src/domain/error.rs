//! Domain error types.
//!
//! These errors represent validation failures in reference data. They are
//! raised when an entity is constructed, so malformed data never reaches the
//! departure engine.

use super::{ExceptionId, FrequencyId, RouteId, SeasonId, StopId};

/// Domain-level errors for reference data validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Stop coordinates are outside the valid latitude/longitude range
    #[error("stop {0} has coordinates out of range")]
    InvalidCoordinates(StopId),

    /// Route stop ordering is broken (must be 1, 2, ... strictly increasing)
    #[error("route {route}: {reason}")]
    InvalidRouteOrder {
        route: RouteId,
        reason: &'static str,
    },

    /// Minutes-from-start or distance-from-previous is negative
    #[error("route {route}: stop {stop} has a negative {field}")]
    NegativeOffset {
        route: RouteId,
        stop: StopId,
        field: &'static str,
    },

    /// Season dates are inconsistent with each other or the season year
    #[error("season {season}: {reason}")]
    InvalidSeason {
        season: SeasonId,
        reason: &'static str,
    },

    /// Frequency interval is zero or negative
    #[error("frequency {frequency}: interval must be positive, got {interval}")]
    NonPositiveInterval { frequency: FrequencyId, interval: i64 },

    /// Exception entry has an invalid combination of fields
    #[error("exception {exception}: {reason}")]
    InvalidException {
        exception: ExceptionId,
        reason: &'static str,
    },
}
