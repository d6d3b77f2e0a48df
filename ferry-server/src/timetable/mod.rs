//! Departure computation.
//!
//! Given reference data behind the [`ReferenceData`] traits, this module
//! builds the day's timetable for every route, resolves the exceptions that
//! apply and produces the ordered list of departures between two stops.

mod config;
mod engine;
#[cfg(test)]
pub(crate) mod fixtures;
mod resolver;
mod schedule;
mod source;

pub use config::EngineConfig;
pub use engine::{DepartureEngine, DepartureQuery, QueryError};
pub use resolver::{ExceptionSet, resolve_exceptions};
pub use schedule::{DayTimetable, build_day_timetable};
pub use source::{
    Clock, ExceptionSource, FixedClock, FrequencySource, ReferenceData, Revision, RouteSource,
    SourceError, SystemClock,
};
