//! Domain types for the ferry timetable.
//!
//! This module contains the validated reference data (stops, routes,
//! seasons, frequencies, exceptions) and the query-time departure types.
//! Reference types enforce their invariants at construction time, so the
//! departure engine can trust every value it receives.

mod calendar;
mod departure;
mod error;
mod exception;
mod frequency;
mod ids;
mod route;
mod stop;
mod time;

pub use calendar::{Season, weekday_of};
pub use departure::{DepartureRecord, InvalidTimeMode, ModeRules, TimeMode};
pub use error::DomainError;
pub use exception::{
    Effect, ExceptionDraft, ExceptionEntry, ExceptionKind, ExceptionScope, Notice,
};
pub use frequency::{Frequency, expand};
pub use ids::{ExceptionId, FrequencyId, NoticeId, RouteId, SeasonId, StopId};
pub use route::{Route, RouteStop};
pub use stop::Stop;
pub use time::{FerryTime, TimeError, format_clock, parse_clock};
