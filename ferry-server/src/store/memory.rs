//! In-memory reference store.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, NaiveTime, Weekday};
use tracing::debug;

use crate::domain::{
    ExceptionDraft, ExceptionEntry, ExceptionId, Frequency, FrequencyId, Notice, NoticeId, Route,
    RouteId, RouteStop, Season, SeasonId, Stop, StopId, parse_clock,
};
use crate::timetable::{
    ExceptionSource, FrequencySource, ReferenceData, Revision, RouteSource, SourceError,
};

use super::error::StoreError;
use super::records::{ExceptionRecord, FrequencyRecord, RouteRecord, SeasonRecord, StopRecord};

#[derive(Debug, Default)]
struct Snapshot {
    stops: BTreeMap<StopId, Stop>,
    routes: BTreeMap<RouteId, Route>,
    seasons: BTreeMap<SeasonId, Season>,
    frequencies: BTreeMap<FrequencyId, Frequency>,
    exceptions: BTreeMap<ExceptionId, ExceptionEntry>,
    notices: BTreeMap<NoticeId, Notice>,
    revision: Revision,
}

/// Entity counts, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub stops: usize,
    pub routes: usize,
    pub seasons: usize,
    pub frequencies: usize,
    pub exceptions: usize,
    pub notices: usize,
}

/// Thread-safe reference data store.
///
/// Cloning is cheap and every clone shares the same data. Each write bumps
/// the revision, so cached timetables built from older data are never
/// reused and every later read observes the write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<RwLockReadGuard<'_, Snapshot>, SourceError> {
        self.inner
            .read()
            .map_err(|_| SourceError::Unavailable("reference store lock poisoned".to_string()))
    }

    /// Writes replace whole entries, so data behind a poisoned lock is still
    /// consistent.
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn counts(&self) -> StoreCounts {
        let guard = self.read();
        StoreCounts {
            stops: guard.stops.len(),
            routes: guard.routes.len(),
            seasons: guard.seasons.len(),
            frequencies: guard.frequencies.len(),
            exceptions: guard.exceptions.len(),
            notices: guard.notices.len(),
        }
    }

    pub fn stop(&self, id: StopId) -> Option<Stop> {
        self.snapshot().ok()?.stops.get(&id).cloned()
    }

    /// All stops, ordered by id.
    pub fn stops(&self) -> Vec<Stop> {
        self.snapshot()
            .map(|s| s.stops.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up a stop by name, ignoring case and surrounding whitespace.
    pub fn stop_by_name(&self, name: &str) -> Option<Stop> {
        self.snapshot()
            .ok()?
            .stops
            .values()
            .find(|s| s.is_named(name))
            .cloned()
    }

    pub fn route(&self, id: RouteId) -> Option<Route> {
        self.snapshot().ok()?.routes.get(&id).cloned()
    }

    pub fn exception(&self, id: ExceptionId) -> Option<ExceptionEntry> {
        self.snapshot().ok()?.exceptions.get(&id).cloned()
    }

    pub fn upsert_stop(&self, stop: Stop) {
        let mut guard = self.write();
        debug!(stop = %stop.id, name = %stop.name, "upsert stop");
        guard.stops.insert(stop.id, stop);
        guard.bump();
    }

    pub fn upsert_notice(&self, notice: Notice) {
        let mut guard = self.write();
        guard.notices.insert(notice.id, notice);
        guard.bump();
    }

    /// Insert or replace a season. Frequencies and exceptions referring to
    /// it pick up the new dates.
    pub fn upsert_season(&self, season: Season) {
        let mut guard = self.write();
        for frequency in guard.frequencies.values_mut() {
            frequency.refresh_season(&season);
        }
        for entry in guard.exceptions.values_mut() {
            entry.refresh_season(&season);
        }
        debug!(season = %season.id(), kind = season.kind(), "upsert season");
        guard.seasons.insert(season.id(), season);
        guard.bump();
    }

    /// Insert or replace a route. Every stop it calls at must exist.
    pub fn upsert_route(&self, route: Route) -> Result<(), StoreError> {
        let mut guard = self.write();
        if let Some(missing) = route
            .stops()
            .iter()
            .map(RouteStop::stop)
            .find(|id| !guard.stops.contains_key(id))
        {
            return Err(StoreError::UnknownStop(missing));
        }
        debug!(route = %route.id(), number = route.number(), "upsert route");
        guard.routes.insert(route.id(), route);
        guard.bump();
        Ok(())
    }

    /// Insert or replace a frequency. Its route must exist.
    pub fn upsert_frequency(&self, frequency: Frequency) -> Result<(), StoreError> {
        let mut guard = self.write();
        guard.require_route(frequency.route())?;
        guard.frequencies.insert(frequency.id(), frequency);
        guard.bump();
        Ok(())
    }

    pub fn remove_frequency(&self, id: FrequencyId) -> Option<Frequency> {
        let mut guard = self.write();
        let removed = guard.frequencies.remove(&id);
        if removed.is_some() {
            guard.bump();
        }
        removed
    }

    /// Insert or replace an exception. Its route, and its stop if pinned to
    /// one, must exist.
    pub fn upsert_exception(&self, entry: ExceptionEntry) -> Result<(), StoreError> {
        let mut guard = self.write();
        guard.require_route(entry.route())?;
        if let Some(stop) = entry.stop() {
            guard.require_stop(stop)?;
        }
        debug!(exception = %entry.id(), kind = ?entry.kind(), "upsert exception");
        guard.exceptions.insert(entry.id(), entry);
        guard.bump();
        Ok(())
    }

    pub fn remove_exception(&self, id: ExceptionId) -> Option<ExceptionEntry> {
        let mut guard = self.write();
        let removed = guard.exceptions.remove(&id);
        if removed.is_some() {
            debug!(exception = %id, "removed exception");
            guard.bump();
        }
        removed
    }

    pub fn add_stop_record(&self, record: StopRecord) -> Result<(), StoreError> {
        let stop = Stop::new(record.id, record.name, record.latitude, record.longitude)?;
        self.upsert_stop(stop);
        Ok(())
    }

    pub fn add_season_record(&self, record: SeasonRecord) -> Result<(), StoreError> {
        let season = Season::new(record.id, record.kind, record.year, record.start, record.end)?;
        self.upsert_season(season);
        Ok(())
    }

    pub fn add_route_record(&self, record: RouteRecord) -> Result<(), StoreError> {
        let stops = record
            .stops
            .into_iter()
            .map(|s| {
                RouteStop::new(
                    record.id,
                    s.stop,
                    s.order,
                    s.minutes_from_start,
                    s.distance_km,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let route = Route::new(record.id, record.number, stops, record.active)?;
        self.upsert_route(route)
    }

    pub fn add_frequency_record(&self, record: FrequencyRecord) -> Result<(), StoreError> {
        let season = record
            .season
            .map(|id| self.read().season(id))
            .transpose()?;
        let frequency = Frequency::new(
            record.id,
            record.route,
            record.weekday,
            season,
            clock_field("first_departure", record.first_departure.as_deref())?,
            clock_field("last_departure", record.last_departure.as_deref())?,
            record.interval_minutes,
        )?;
        self.upsert_frequency(frequency)
    }

    /// Validate and store an exception record, assigning an id if it has
    /// none. Returns the stored entry.
    pub fn add_exception_record(
        &self,
        record: ExceptionRecord,
    ) -> Result<ExceptionEntry, StoreError> {
        let mut guard = self.write();

        let id = match record.id {
            Some(id) => id,
            None => guard.next_exception_id()?,
        };
        let season = record.season.map(|s| guard.season(s)).transpose()?;
        let notice = record
            .notice
            .map(|n| {
                guard
                    .notices
                    .get(&n)
                    .cloned()
                    .ok_or(StoreError::UnknownNotice(n))
            })
            .transpose()?;

        let entry = ExceptionEntry::try_from(ExceptionDraft {
            id,
            route: record.route,
            stop: record.stop,
            valid_date: record.valid_date,
            weekday: record.weekday,
            season,
            departure_time: clock_field("departure_time", record.departure_time.as_deref())?,
            kind: record.kind,
            active: record.active,
            notice,
        })?;

        guard.require_route(entry.route())?;
        if let Some(stop) = entry.stop() {
            guard.require_stop(stop)?;
        }
        debug!(exception = %id, kind = ?entry.kind(), "added exception");
        guard.exceptions.insert(id, entry.clone());
        guard.bump();
        Ok(entry)
    }
}

impl Snapshot {
    fn bump(&mut self) {
        self.revision = self.revision.next();
    }

    fn next_exception_id(&self) -> Result<ExceptionId, StoreError> {
        match self.exceptions.keys().next_back() {
            None => Ok(ExceptionId(1)),
            Some(last) => last
                .get()
                .checked_add(1)
                .map(ExceptionId)
                .ok_or(StoreError::ExceptionIdsExhausted),
        }
    }

    fn season(&self, id: SeasonId) -> Result<Season, StoreError> {
        self.seasons
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownSeason(id))
    }

    fn require_route(&self, id: RouteId) -> Result<(), StoreError> {
        if self.routes.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::UnknownRoute(id))
        }
    }

    fn require_stop(&self, id: StopId) -> Result<(), StoreError> {
        if self.stops.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::UnknownStop(id))
        }
    }

    fn exceptions_where(&self, keep: impl Fn(&ExceptionEntry) -> bool) -> Vec<ExceptionEntry> {
        self.exceptions
            .values()
            .filter(|e| keep(e))
            .cloned()
            .collect()
    }
}

fn clock_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveTime>, StoreError> {
    value
        .map(parse_clock)
        .transpose()
        .map_err(|source| StoreError::Time { field, source })
}

impl RouteSource for MemoryStore {
    fn active_routes(&self) -> Result<Vec<Route>, SourceError> {
        Ok(self
            .snapshot()?
            .routes
            .values()
            .filter(|r| r.is_active())
            .cloned()
            .collect())
    }
}

impl FrequencySource for MemoryStore {
    fn frequencies_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<Frequency>, SourceError> {
        Ok(self
            .snapshot()?
            .frequencies
            .values()
            .filter(|f| f.route() == route && f.matches_date(date))
            .cloned()
            .collect())
    }

    fn frequencies_on_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<Frequency>, SourceError> {
        Ok(self
            .snapshot()?
            .frequencies
            .values()
            .filter(|f| f.route() == route && f.weekday() == weekday)
            .cloned()
            .collect())
    }
}

impl ExceptionSource for MemoryStore {
    fn exceptions_for_route_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        Ok(self
            .snapshot()?
            .exceptions_where(|e| e.route() == route && e.valid_date() == Some(date)))
    }

    fn exceptions_for_route_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        Ok(self
            .snapshot()?
            .exceptions_where(|e| e.route() == route && e.weekday() == Some(weekday)))
    }

    fn exceptions_for_stop_on(
        &self,
        stop: StopId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        Ok(self
            .snapshot()?
            .exceptions_where(|e| e.stop() == Some(stop) && e.valid_date() == Some(date)))
    }

    fn exceptions_for_stop_weekday(
        &self,
        stop: StopId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        Ok(self
            .snapshot()?
            .exceptions_where(|e| e.stop() == Some(stop) && e.weekday() == Some(weekday)))
    }
}

impl ReferenceData for MemoryStore {
    fn revision(&self) -> Revision {
        self.read().revision
    }
}
