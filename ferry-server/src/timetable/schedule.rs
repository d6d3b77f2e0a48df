//! Per-day timetable construction.
//!
//! Turns the recurring frequencies of every active route into the concrete
//! set of departure clock-times for one date.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{Frequency, FrequencyId, Route, RouteId, weekday_of};

use super::source::{FrequencySource, SourceError};

/// Departure clock-times of each route on one date.
///
/// Every slot remembers the frequency that produced it first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTimetable {
    date: NaiveDate,
    routes: BTreeMap<RouteId, BTreeMap<NaiveTime, FrequencyId>>,
}

impl DayTimetable {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Clock-times for `route`, ascending. Empty for unknown routes.
    pub fn slots(&self, route: RouteId) -> impl Iterator<Item = NaiveTime> + '_ {
        self.routes
            .get(&route)
            .into_iter()
            .flat_map(|slots| slots.keys().copied())
    }

    /// The frequency that produced the slot at `clock` on `route`.
    #[cfg(test)]
    fn source_of(&self, route: RouteId, clock: NaiveTime) -> Option<FrequencyId> {
        self.routes.get(&route)?.get(&clock).copied()
    }

    /// Number of routes with at least one departure.
    pub fn route_count(&self) -> usize {
        self.routes.values().filter(|slots| !slots.is_empty()).count()
    }

    pub fn slot_count(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }
}

/// Build the timetable of every active route in `routes` for `date`.
///
/// Frequencies tied to the date exactly (weekday and season) take priority.
/// Only when a route has none does it fall back to every frequency on the
/// weekday, minus those whose season excludes the date.
pub fn build_day_timetable<S: FrequencySource + ?Sized>(
    source: &S,
    routes: &[Route],
    date: NaiveDate,
) -> Result<DayTimetable, SourceError> {
    let weekday = weekday_of(date);
    let mut timetable = DayTimetable {
        date,
        routes: BTreeMap::new(),
    };

    for route in routes.iter().filter(|r| r.is_active()) {
        let frequencies = frequencies_for(source, route.id(), date)?;

        let slots = timetable.routes.entry(route.id()).or_default();
        for frequency in &frequencies {
            for clock in frequency.departures() {
                slots.entry(clock).or_insert(frequency.id());
            }
        }

        debug!(
            route = %route.id(),
            %weekday,
            frequencies = frequencies.len(),
            slots = slots.len(),
            "expanded route timetable"
        );
    }

    debug!(
        %date,
        routes = timetable.route_count(),
        slots = timetable.slot_count(),
        "built day timetable"
    );
    Ok(timetable)
}

fn frequencies_for<S: FrequencySource + ?Sized>(
    source: &S,
    route: RouteId,
    date: NaiveDate,
) -> Result<Vec<Frequency>, SourceError> {
    let weekday = weekday_of(date);

    let mut frequencies: Vec<Frequency> = source
        .frequencies_on(route, date)?
        .into_iter()
        .filter(|f| f.matches_date(date))
        .collect();

    if frequencies.is_empty() {
        frequencies = source.frequencies_on_weekday(route, weekday)?;
        frequencies.retain(|f| f.weekday() == weekday);
    }

    frequencies.retain(|f| f.in_season(date));
    Ok(frequencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::fixtures::*;
    use crate::timetable::source::RouteSource;
    use chrono::Weekday;

    fn shown(timetable: &DayTimetable, route: u32) -> Vec<String> {
        timetable
            .slots(RouteId(route))
            .map(|t| t.format("%H:%M").to_string())
            .collect()
    }

    fn build(data: &FixtureData, date: NaiveDate) -> DayTimetable {
        let routes = data.active_routes().unwrap();
        build_day_timetable(data, &routes, date).unwrap()
    }

    #[test]
    fn expands_matching_frequency() {
        let data = FixtureData::scenario();
        let timetable = build(&data, monday());

        assert_eq!(timetable.date(), monday());
        assert_eq!(shown(&timetable, 1), ["08:00", "08:30", "09:00"]);
        assert_eq!(timetable.route_count(), 1);
        assert_eq!(timetable.slot_count(), 3);
    }

    #[test]
    fn other_weekday_yields_nothing() {
        let data = FixtureData::scenario();
        let tuesday = monday().succ_opt().unwrap();
        let timetable = build(&data, tuesday);

        assert!(shown(&timetable, 1).is_empty());
        assert_eq!(timetable.route_count(), 0);
    }

    #[test]
    fn exact_match_shadows_weekday_fallback() {
        let mut data = FixtureData::scenario();
        // Seasonless, so it only qualifies through the weekday fallback
        data.add_frequency(frequency_in(2, 1, Weekday::Mon, None, "12:00", "12:00", 60));

        let timetable = build(&data, monday());
        assert_eq!(shown(&timetable, 1), ["08:00", "08:30", "09:00"]);
    }

    #[test]
    fn fallback_drops_out_of_season_frequencies() {
        let mut data = FixtureData::scenario();
        data.add_frequency(frequency_in(2, 1, Weekday::Mon, None, "12:00", "12:00", 60));

        // First Monday of September: the summer frequency is out of season
        let september = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let timetable = build(&data, september);
        assert_eq!(shown(&timetable, 1), ["12:00"]);
    }

    #[test]
    fn overlapping_frequencies_merge_first_wins() {
        let mut data = FixtureData::scenario();
        data.add_frequency(frequency(2, 1, Weekday::Mon, "08:30", "09:30", 15));

        let timetable = build(&data, monday());
        assert_eq!(
            shown(&timetable, 1),
            ["08:00", "08:30", "08:45", "09:00", "09:15", "09:30"]
        );
        assert_eq!(
            timetable.source_of(RouteId(1), clock("08:30")),
            Some(FrequencyId(1))
        );
        assert_eq!(
            timetable.source_of(RouteId(1), clock("08:45")),
            Some(FrequencyId(2))
        );
        assert_eq!(timetable.source_of(RouteId(1), clock("10:00")), None);
    }

    #[test]
    fn inactive_routes_are_skipped() {
        let data = FixtureData::scenario();
        let route = route_abc(1, "R1");
        let inactive = Route::new(route.id(), "R1", route.stops().to_vec(), false).unwrap();

        let timetable = build_day_timetable(&data, &[inactive], monday()).unwrap();
        assert_eq!(timetable.slot_count(), 0);
    }

    #[test]
    fn source_failure_propagates() {
        let data = FixtureData::scenario().failing();
        let routes = vec![route_abc(1, "R1")];
        assert!(build_day_timetable(&data, &routes, monday()).is_err());
    }
}
