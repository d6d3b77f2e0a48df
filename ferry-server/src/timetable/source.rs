//! Reference data sources consumed by the departure engine.
//!
//! The engine never owns reference data. It reads a fresh view through these
//! traits on every call, which lets the planner run against the in-memory
//! store in production and hand-built fixtures in tests.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, Weekday};

use crate::domain::{ExceptionEntry, Frequency, Route, RouteId, StopId};

/// Error from a reference data source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The backing store could not be read
    #[error("reference data unavailable: {0}")]
    Unavailable(String),
}

/// Monotonic counter identifying a version of the reference data.
///
/// Sources bump it on every write, so two reads that observe the same
/// revision observe the same routes, frequencies, seasons and exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Revision(pub u64);

impl Revision {
    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Provides routes with their stop topology.
pub trait RouteSource {
    /// All active routes.
    fn active_routes(&self) -> Result<Vec<Route>, SourceError>;
}

/// Provides recurring frequencies.
pub trait FrequencySource {
    /// Frequencies of `route` tied to `date`: the weekday matches and their
    /// season covers the date.
    fn frequencies_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<Frequency>, SourceError>;

    /// Frequencies of `route` running on `weekday`, regardless of season.
    fn frequencies_on_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<Frequency>, SourceError>;
}

/// Provides schedule exceptions along four lookup axes.
pub trait ExceptionSource {
    /// Exceptions of `route` pinned to `date`.
    fn exceptions_for_route_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError>;

    /// Exceptions of `route` recurring on `weekday`.
    fn exceptions_for_route_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError>;

    /// Exceptions at `stop` pinned to `date`, on any route.
    fn exceptions_for_stop_on(
        &self,
        stop: StopId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError>;

    /// Exceptions at `stop` recurring on `weekday`, on any route.
    fn exceptions_for_stop_weekday(
        &self,
        stop: StopId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError>;
}

/// Everything the departure engine reads, plus a revision for caching.
pub trait ReferenceData: RouteSource + FrequencySource + ExceptionSource {
    /// Current revision of the data.
    fn revision(&self) -> Revision;
}

/// Source of the current local time, for "now" queries.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
