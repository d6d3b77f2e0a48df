//! Exception resolution.
//!
//! Collects the exceptions relevant to one route and boarding stop on a
//! travel date, and answers what they do to each departure slot.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use tracing::trace;

use crate::domain::{Effect, ExceptionEntry, Notice, RouteId, StopId, weekday_of};

use super::source::{ExceptionSource, SourceError};

/// The exceptions in force for one route and boarding stop on one date.
#[derive(Debug, Clone)]
pub struct ExceptionSet {
    stop: StopId,
    entries: Vec<ExceptionEntry>,
}

/// Collect every exception reachable from `route` or `stop` on `date`.
///
/// Four lookups are unioned: route by date, route by weekday, stop by date
/// and stop by weekday. An entry found along several axes is kept once, and
/// only entries that actually apply on `date` survive. Entries are ordered by
/// id so that "first matching exception" is stable between calls.
pub fn resolve_exceptions<S: ExceptionSource + ?Sized>(
    source: &S,
    route: RouteId,
    stop: StopId,
    date: NaiveDate,
) -> Result<ExceptionSet, SourceError> {
    let weekday = weekday_of(date);

    let lookups = [
        source.exceptions_for_route_on(route, date)?,
        source.exceptions_for_route_weekday(route, weekday)?,
        source.exceptions_for_stop_on(stop, date)?,
        source.exceptions_for_stop_weekday(stop, weekday)?,
    ];

    let mut by_id = BTreeMap::new();
    for entry in lookups.into_iter().flatten() {
        by_id.entry(entry.id()).or_insert(entry);
    }

    let entries: Vec<ExceptionEntry> = by_id
        .into_values()
        .filter(|e| e.applies_to(date))
        .collect();

    trace!(%route, %stop, %date, count = entries.len(), "resolved exceptions");

    Ok(ExceptionSet { stop, entries })
}

impl ExceptionSet {
    /// Build a set directly from entries that are already known to apply.
    #[cfg(test)]
    fn new(stop: StopId, mut entries: Vec<ExceptionEntry>) -> Self {
        entries.sort_by_key(ExceptionEntry::id);
        entries.dedup_by_key(|e| e.id());
        Self { stop, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries targeting the slot at `clock` for the boarding stop.
    fn targeting(&self, clock: NaiveTime) -> impl Iterator<Item = &ExceptionEntry> {
        self.entries
            .iter()
            .filter(move |e| e.targets(clock, self.stop))
    }

    /// True if a CANCELLED or OMITTED exception removes the slot at `clock`.
    pub fn is_suppressed(&self, clock: NaiveTime) -> bool {
        self.targeting(clock)
            .any(|e| e.effect() == Effect::Suppress)
    }

    /// True if a DELAYED exception shifts the slot at `clock`.
    pub fn is_delayed(&self, clock: NaiveTime) -> bool {
        self.targeting(clock).any(|e| e.effect() == Effect::Shift)
    }

    /// Message of the first exception targeting the slot at `clock`.
    pub fn notice_for(&self, clock: NaiveTime) -> Option<&Notice> {
        self.targeting(clock).next().and_then(|e| e.notice())
    }

    /// EXTRA exceptions on `route` that board at this set's stop.
    pub fn extras(&self, route: RouteId) -> impl Iterator<Item = &ExceptionEntry> {
        self.entries.iter().filter(move |e| {
            e.effect() == Effect::Add && e.route() == route && e.affects_stop(self.stop)
        })
    }
}
