//! Calendar helpers: weekdays and timetable seasons.

use chrono::{Datelike, NaiveDate, Weekday};

use super::{DomainError, SeasonId};

/// Returns the weekday a date falls on.
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// A timetable season, e.g. "summer 2024".
///
/// Seasons bound when weekday-based frequencies and exceptions apply. Both
/// bounds are inclusive and must fall within the season's year.
///
/// # Examples
///
/// ```
/// use ferry_server::domain::{Season, SeasonId};
/// use chrono::NaiveDate;
///
/// let d = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
/// let summer = Season::new(SeasonId(1), "summer", 2024, d(6, 1), d(8, 31)).unwrap();
///
/// assert!(summer.covers(d(6, 1)));
/// assert!(summer.covers(d(8, 31)));
/// assert!(!summer.covers(d(9, 1)));
///
/// // End before start is rejected
/// assert!(Season::new(SeasonId(2), "broken", 2024, d(8, 31), d(6, 1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    id: SeasonId,
    kind: String,
    year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl Season {
    /// Create a season, validating that `start <= end` and both fall in `year`.
    pub fn new(
        id: SeasonId,
        kind: impl Into<String>,
        year: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidSeason {
                season: id,
                reason: "start date is after end date",
            });
        }
        if start.year() != year || end.year() != year {
            return Err(DomainError::InvalidSeason {
                season: id,
                reason: "start and end must fall within the season year",
            });
        }

        Ok(Self {
            id,
            kind: kind.into(),
            year,
            start,
            end,
        })
    }

    pub fn id(&self) -> SeasonId {
        self.id
    }

    /// Free-form season label ("summer", "winter", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True if `date` lies within the season, bounds inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
