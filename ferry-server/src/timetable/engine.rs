//! Departure query engine.
//!
//! Answers "which sailings go from A to B around this time" by expanding the
//! day's timetable, applying exceptions per route and filtering by the
//! requested time mode.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::cache::TimetableCache;
use crate::domain::{DepartureRecord, FerryTime, ModeRules, Route, StopId, TimeMode};

use super::config::EngineConfig;
use super::resolver::{ExceptionSet, resolve_exceptions};
use super::schedule::{DayTimetable, build_day_timetable};
use super::source::{Clock, ReferenceData, Revision, SourceError};

/// Error from a departure query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// Reference data could not be read
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Request for departures between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureQuery {
    /// Boarding stop.
    pub from: StopId,

    /// Alighting stop.
    pub to: StopId,

    /// Travel date. Replaced by the clock's date in [`TimeMode::Now`].
    pub date: NaiveDate,

    /// Requested time. Without one, the whole day is returned.
    pub time: Option<NaiveTime>,

    pub mode: TimeMode,
}

impl DepartureQuery {
    /// Create a new departure query.
    pub fn new(
        from: StopId,
        to: StopId,
        date: NaiveDate,
        time: Option<NaiveTime>,
        mode: TimeMode,
    ) -> Self {
        Self {
            from,
            to,
            date,
            time,
            mode,
        }
    }
}

/// Computes departure lists from reference data.
///
/// The engine only borrows its collaborators. Every call reads a fresh view
/// of the reference data, so two calls against an unchanged source return
/// identical lists.
pub struct DepartureEngine<'a, S: ReferenceData + ?Sized> {
    source: &'a S,
    clock: &'a dyn Clock,
    config: &'a EngineConfig,
    cache: Option<&'a TimetableCache>,
}

impl<'a, S: ReferenceData + ?Sized> DepartureEngine<'a, S> {
    pub fn new(source: &'a S, clock: &'a dyn Clock, config: &'a EngineConfig) -> Self {
        Self {
            source,
            clock,
            config,
            cache: None,
        }
    }

    /// Reuse day timetables across calls through `cache`.
    pub fn with_cache(mut self, cache: &'a TimetableCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Compute the departures matching `query`, ordered for its time mode.
    ///
    /// Unknown stops, or stops no route serves in that order, give an empty
    /// list. The only error is a failing reference data source.
    pub fn compute_departures(
        &self,
        query: &DepartureQuery,
    ) -> Result<Vec<DepartureRecord>, QueryError> {
        let (date, time) = match query.mode {
            TimeMode::Now => {
                let now = self.clock.now();
                (now.date(), Some(now.time()))
            }
            TimeMode::Depart | TimeMode::Arrival => (query.date, query.time),
        };
        let requested = time.map(|t| date.and_time(t));
        let rules = query.mode.rules();

        let revision = self.source.revision();
        let routes = self.source.active_routes()?;
        let timetable = self.timetable(&routes, date, revision)?;

        let mut departures = Vec::new();
        for route in routes
            .iter()
            .filter(|r| r.in_order(query.from, query.to))
        {
            let exceptions = resolve_exceptions(self.source, route.id(), query.from, date)?;
            let walk = RouteWalk {
                route,
                from: query.from,
                to: query.to,
                date,
                requested,
                rules,
                delay: self.config.delay(),
                delay_minutes: self.config.delay_minutes,
            };
            let found = walk.run(&timetable, &exceptions);

            debug!(
                route = %route.id(),
                exceptions = exceptions.len(),
                departures = found.len(),
                "walked route"
            );
            departures.extend(found);
        }

        departures.sort_by(rules.order);

        info!(
            from = %query.from,
            to = %query.to,
            %date,
            mode = %query.mode,
            %revision,
            count = departures.len(),
            "computed departures"
        );

        Ok(departures)
    }

    fn timetable(
        &self,
        routes: &[Route],
        date: NaiveDate,
        revision: Revision,
    ) -> Result<Arc<DayTimetable>, SourceError> {
        if let Some(cached) = self.cache.and_then(|c| c.get(date, revision)) {
            return Ok(cached);
        }

        let built = Arc::new(build_day_timetable(self.source, routes, date)?);
        if let Some(cache) = self.cache {
            cache.insert(date, revision, Arc::clone(&built));
        }
        Ok(built)
    }
}

/// Per-route state for turning timetable slots into departure records.
struct RouteWalk<'r> {
    route: &'r Route,
    from: StopId,
    to: StopId,
    date: NaiveDate,
    requested: Option<NaiveDateTime>,
    rules: ModeRules,
    delay: Duration,
    delay_minutes: u32,
}

impl RouteWalk<'_> {
    fn run(&self, timetable: &DayTimetable, exceptions: &ExceptionSet) -> Vec<DepartureRecord> {
        let mut emitted = HashSet::new();
        let mut records = Vec::new();

        for slot in timetable.slots(self.route.id()) {
            if exceptions.is_suppressed(slot) {
                continue;
            }
            let delayed = exceptions.is_delayed(slot);
            let Some(mut record) = self.record_at(slot, delayed) else {
                continue;
            };
            record.notice = exceptions.notice_for(slot).cloned();
            self.emit(record, &mut emitted, &mut records);
        }

        for extra in exceptions.extras(self.route.id()) {
            let Some(mut record) = self.record_at(extra.departure_time(), false) else {
                continue;
            };
            record.is_extra = true;
            record.notice = extra.notice().cloned();
            self.emit(record, &mut emitted, &mut records);
        }

        records
    }

    /// Build the record for a route-relative clock-time. `None` if the
    /// offsets push it past the representable calendar.
    fn record_at(&self, slot: NaiveTime, delayed: bool) -> Option<DepartureRecord> {
        let shift = if delayed { self.delay } else { Duration::zero() };
        let start = FerryTime::new(self.date, slot);
        let planned_departure = start.checked_add(self.route.offset(self.from) + shift)?;
        let arrival_time = start.checked_add(self.route.offset(self.to) + shift)?;

        Some(DepartureRecord {
            route: self.route.id(),
            route_number: self.route.number().to_string(),
            from: self.from,
            to: self.to,
            planned_departure,
            arrival_time,
            is_extra: false,
            delay_minutes: delayed.then_some(self.delay_minutes),
            notice: None,
        })
    }

    /// Keep `record` if it passes the mode filter and its departure time is
    /// new for this route.
    fn emit(
        &self,
        record: DepartureRecord,
        emitted: &mut HashSet<FerryTime>,
        records: &mut Vec<DepartureRecord>,
    ) {
        if let Some(requested) = self.requested {
            if !(self.rules.admits)(&record, requested) {
                return;
            }
        }
        if emitted.insert(record.planned_departure) {
            records.push(record);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
