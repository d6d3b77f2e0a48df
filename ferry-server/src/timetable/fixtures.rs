//! In-memory reference data and builders shared by the timetable tests.

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime, Weekday};

use super::source::{
    ExceptionSource, FrequencySource, ReferenceData, Revision, RouteSource, SourceError,
};
use crate::domain::{
    ExceptionDraft, ExceptionEntry, ExceptionId, ExceptionKind, ExceptionScope, Frequency,
    FrequencyId, Notice, NoticeId, Route, RouteId, RouteStop, Season, SeasonId, StopId,
    parse_clock, weekday_of,
};

/// Mock reference data for testing.
pub struct FixtureData {
    routes: Vec<Route>,
    frequencies: Vec<Frequency>,
    exceptions: Vec<ExceptionEntry>,
    revision: Revision,
    frequency_lookups: Mutex<usize>,
    fail: bool,
}

impl FixtureData {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            frequencies: Vec::new(),
            exceptions: Vec::new(),
            revision: Revision::default(),
            frequency_lookups: Mutex::new(0),
            fail: false,
        }
    }

    /// R1 (A -> B -> C) running Mondays in summer, 08:00-09:00 every 30.
    pub fn scenario() -> Self {
        let mut data = Self::new();
        data.add_route(route_abc(1, "R1"));
        data.add_frequency(frequency(1, 1, Weekday::Mon, "08:00", "09:00", 30));
        data
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
        self.revision = self.revision.next();
    }

    pub fn add_frequency(&mut self, frequency: Frequency) {
        self.frequencies.push(frequency);
        self.revision = self.revision.next();
    }

    pub fn add_exception(&mut self, entry: ExceptionEntry) {
        self.exceptions.push(entry);
        self.revision = self.revision.next();
    }

    /// Make every lookup fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn frequency_lookups(&self) -> usize {
        *self.frequency_lookups.lock().unwrap()
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.fail {
            Err(SourceError::Unavailable("fixture configured to fail".into()))
        } else {
            Ok(())
        }
    }

    fn exceptions_where(
        &self,
        keep: impl Fn(&ExceptionEntry) -> bool,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        self.check()?;
        Ok(self.exceptions.iter().filter(|e| keep(e)).cloned().collect())
    }
}

impl RouteSource for FixtureData {
    fn active_routes(&self) -> Result<Vec<Route>, SourceError> {
        self.check()?;
        Ok(self.routes.iter().filter(|r| r.is_active()).cloned().collect())
    }
}

impl FrequencySource for FixtureData {
    fn frequencies_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<Frequency>, SourceError> {
        self.check()?;
        *self.frequency_lookups.lock().unwrap() += 1;
        Ok(self
            .frequencies
            .iter()
            .filter(|f| f.route() == route && f.matches_date(date))
            .cloned()
            .collect())
    }

    fn frequencies_on_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<Frequency>, SourceError> {
        self.check()?;
        *self.frequency_lookups.lock().unwrap() += 1;
        Ok(self
            .frequencies
            .iter()
            .filter(|f| f.route() == route && f.weekday() == weekday)
            .cloned()
            .collect())
    }
}

impl ExceptionSource for FixtureData {
    fn exceptions_for_route_on(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        self.exceptions_where(|e| e.route() == route && e.valid_date() == Some(date))
    }

    fn exceptions_for_route_weekday(
        &self,
        route: RouteId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        self.exceptions_where(|e| e.route() == route && e.weekday() == Some(weekday))
    }

    fn exceptions_for_stop_on(
        &self,
        stop: StopId,
        date: NaiveDate,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        self.exceptions_where(|e| e.stop() == Some(stop) && e.valid_date() == Some(date))
    }

    fn exceptions_for_stop_weekday(
        &self,
        stop: StopId,
        weekday: Weekday,
    ) -> Result<Vec<ExceptionEntry>, SourceError> {
        self.exceptions_where(|e| e.stop() == Some(stop) && e.weekday() == Some(weekday))
    }
}

impl ReferenceData for FixtureData {
    fn revision(&self) -> Revision {
        self.revision
    }
}

/// Monday 3 June 2024.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

pub fn clock(s: &str) -> NaiveTime {
    parse_clock(s).unwrap()
}

/// June to August 2024.
pub fn summer() -> Season {
    Season::new(
        SeasonId(1),
        "summer",
        2024,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
    )
    .unwrap()
}

/// Stops A=1, B=2, C=3 at 0, 20 and 45 minutes.
pub fn route_abc(id: u32, number: &str) -> Route {
    route_with(id, number, &[(1, 0), (2, 20), (3, 45)])
}

/// A route over `(stop, minutes from start)` pairs, in sailing order.
pub fn route_with(id: u32, number: &str, stops: &[(u32, i64)]) -> Route {
    let route = RouteId(id);
    let stops = stops
        .iter()
        .enumerate()
        .map(|(i, (stop, minutes))| {
            RouteStop::new(route, StopId(*stop), i as u32 + 1, *minutes, 1.5).unwrap()
        })
        .collect();
    Route::new(route, number, stops, true).unwrap()
}

/// A summer frequency.
pub fn frequency(
    id: u32,
    route: u32,
    weekday: Weekday,
    first: &str,
    last: &str,
    interval: i64,
) -> Frequency {
    frequency_in(id, route, weekday, Some(summer()), first, last, interval)
}

pub fn frequency_in(
    id: u32,
    route: u32,
    weekday: Weekday,
    season: Option<Season>,
    first: &str,
    last: &str,
    interval: i64,
) -> Frequency {
    Frequency::new(
        FrequencyId(id),
        RouteId(route),
        weekday,
        season,
        Some(clock(first)),
        Some(clock(last)),
        interval,
    )
    .unwrap()
}

fn draft(
    id: u32,
    route: u32,
    stop: Option<u32>,
    time: &str,
    kind: ExceptionKind,
) -> ExceptionDraft {
    ExceptionDraft {
        id: ExceptionId(id),
        route: RouteId(route),
        stop: stop.map(StopId),
        valid_date: None,
        weekday: None,
        season: None,
        departure_time: Some(clock(time)),
        kind,
        active: true,
        notice: None,
    }
}

/// An exception pinned to [`monday`].
pub fn dated_exception(
    id: u32,
    route: u32,
    stop: Option<u32>,
    time: &str,
    kind: ExceptionKind,
) -> ExceptionEntry {
    dated_exception_on(id, route, stop, time, kind, monday())
}

pub fn dated_exception_on(
    id: u32,
    route: u32,
    stop: Option<u32>,
    time: &str,
    kind: ExceptionKind,
    date: NaiveDate,
) -> ExceptionEntry {
    ExceptionEntry::try_from(ExceptionDraft {
        valid_date: Some(date),
        ..draft(id, route, stop, time, kind)
    })
    .unwrap()
}

/// An exception recurring on Mondays in summer.
pub fn weekly_exception(
    id: u32,
    route: u32,
    stop: Option<u32>,
    time: &str,
    kind: ExceptionKind,
) -> ExceptionEntry {
    weekly_exception_on(id, route, stop, time, kind, weekday_of(monday()))
}

pub fn weekly_exception_on(
    id: u32,
    route: u32,
    stop: Option<u32>,
    time: &str,
    kind: ExceptionKind,
    weekday: Weekday,
) -> ExceptionEntry {
    ExceptionEntry::try_from(ExceptionDraft {
        weekday: Some(weekday),
        season: Some(summer()),
        ..draft(id, route, stop, time, kind)
    })
    .unwrap()
}

/// Rebuild `entry` with its active flag cleared.
pub fn inactive(entry: ExceptionEntry) -> ExceptionEntry {
    ExceptionEntry::try_from(ExceptionDraft {
        active: false,
        ..draft_of(&entry)
    })
    .unwrap()
}

/// Rebuild `entry` with a notice whose id matches the exception id.
pub fn with_notice(entry: ExceptionEntry, text: &str) -> ExceptionEntry {
    let notice = Notice {
        id: NoticeId(entry.id().get()),
        text: text.to_string(),
    };
    ExceptionEntry::try_from(ExceptionDraft {
        notice: Some(notice),
        ..draft_of(&entry)
    })
    .unwrap()
}

fn draft_of(entry: &ExceptionEntry) -> ExceptionDraft {
    let season = match entry.scope() {
        ExceptionScope::Weekly { season, .. } => Some(season.clone()),
        ExceptionScope::Date(_) => None,
    };
    ExceptionDraft {
        id: entry.id(),
        route: entry.route(),
        stop: entry.stop(),
        valid_date: entry.valid_date(),
        weekday: entry.weekday(),
        season,
        departure_time: Some(entry.departure_time()),
        kind: entry.kind(),
        active: entry.is_active(),
        notice: entry.notice().cloned(),
    }
}
