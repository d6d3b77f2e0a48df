//! Recurring departure patterns.
//!
//! A frequency says "route R leaves its first stop every N minutes between
//! first and last departure on this weekday, within this season". Expanding
//! it yields the concrete clock-times of that day.

use chrono::{Duration, NaiveDate, NaiveTime, Weekday};

use super::{DomainError, FrequencyId, RouteId, Season, weekday_of};

/// Expand a recurring pattern into its clock-times.
///
/// Starts at `first`, steps by `interval_minutes` and includes `last` when it
/// lands on a step. Returns nothing if either bound is missing, the interval
/// is not positive, or `last` is before `first`. Never wraps past midnight.
///
/// # Examples
///
/// ```
/// use ferry_server::domain::{expand, parse_clock};
///
/// let times = expand(parse_clock("08:00").ok(), parse_clock("09:00").ok(), 30);
/// let shown: Vec<_> = times.iter().map(|t| t.format("%H:%M").to_string()).collect();
/// assert_eq!(shown, ["08:00", "08:30", "09:00"]);
///
/// assert!(expand(parse_clock("08:00").ok(), None, 30).is_empty());
/// assert!(expand(parse_clock("08:00").ok(), parse_clock("09:00").ok(), 0).is_empty());
/// ```
pub fn expand(
    first: Option<NaiveTime>,
    last: Option<NaiveTime>,
    interval_minutes: i64,
) -> Vec<NaiveTime> {
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    if interval_minutes <= 0 {
        return Vec::new();
    }

    let step = Duration::minutes(interval_minutes);
    let mut times = Vec::new();
    let mut current = first;

    while current <= last {
        times.push(current);
        let (next, wrapped_secs) = current.overflowing_add_signed(step);
        if wrapped_secs != 0 {
            break;
        }
        current = next;
    }

    times
}

/// A recurring departure pattern for one route on one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    id: FrequencyId,
    route: RouteId,
    weekday: Weekday,
    season: Option<Season>,
    first_departure: Option<NaiveTime>,
    last_departure: Option<NaiveTime>,
    interval_minutes: u32,
}

impl Frequency {
    /// Create a frequency. Fails on a zero or negative interval.
    pub fn new(
        id: FrequencyId,
        route: RouteId,
        weekday: Weekday,
        season: Option<Season>,
        first_departure: Option<NaiveTime>,
        last_departure: Option<NaiveTime>,
        interval_minutes: i64,
    ) -> Result<Self, DomainError> {
        let interval = u32::try_from(interval_minutes)
            .ok()
            .filter(|i| *i > 0)
            .ok_or(DomainError::NonPositiveInterval {
                frequency: id,
                interval: interval_minutes,
            })?;

        Ok(Self {
            id,
            route,
            weekday,
            season,
            first_departure,
            last_departure,
            interval_minutes: interval,
        })
    }

    pub fn id(&self) -> FrequencyId {
        self.id
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn season(&self) -> Option<&Season> {
        self.season.as_ref()
    }

    pub fn first_departure(&self) -> Option<NaiveTime> {
        self.first_departure
    }

    pub fn last_departure(&self) -> Option<NaiveTime> {
        self.last_departure
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// True if this frequency is tied to `date` exactly: same weekday and a
    /// season that covers the date.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.weekday == weekday_of(date) && self.season.as_ref().is_some_and(|s| s.covers(date))
    }

    /// False only when the frequency has a season that excludes `date`.
    pub fn in_season(&self, date: NaiveDate) -> bool {
        self.season.as_ref().is_none_or(|s| s.covers(date))
    }

    /// The clock-times this pattern produces.
    pub fn departures(&self) -> Vec<NaiveTime> {
        expand(
            self.first_departure,
            self.last_departure,
            i64::from(self.interval_minutes),
        )
    }

    /// Swap in an updated copy of the season this frequency refers to.
    pub(crate) fn refresh_season(&mut self, season: &Season) {
        if self.season.as_ref().is_some_and(|s| s.id() == season.id()) {
            self.season = Some(season.clone());
        }
    }
}
