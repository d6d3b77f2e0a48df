//! Clock-time and sailing-time handling.
//!
//! Timetable data stores departures as bare "HH:MM" clock-times relative to a
//! route's first stop. Once a clock-time is pinned to a travel date and a
//! stop offset is added it becomes a [`FerryTime`], which tracks the date too
//! so that late sailings crossing midnight sort after the evening ones.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a clock-time from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use ferry_server::domain::parse_clock;
///
/// assert!(parse_clock("00:00").is_ok());
/// assert!(parse_clock("23:59").is_ok());
///
/// assert!(parse_clock("0800").is_err());
/// assert!(parse_clock("8:00").is_err());
/// assert!(parse_clock("24:00").is_err());
/// ```
pub fn parse_clock(s: &str) -> Result<NaiveTime, TimeError> {
    // Must be exactly 5 characters: HH:MM
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Format a clock-time as "HH:MM".
pub fn format_clock(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// A date-aware time at which a sailing leaves or reaches a stop.
///
/// # Examples
///
/// ```
/// use ferry_server::domain::FerryTime;
/// use chrono::{Duration, NaiveDate};
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let time = FerryTime::parse_hhmm("23:40", date).unwrap();
///
/// // A 45 minute crossing lands on the next day
/// let arrival = time.checked_add(Duration::minutes(45)).unwrap();
/// assert_eq!(arrival.to_string(), "00:25");
/// assert_eq!(arrival.date(), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FerryTime {
    // Field order matters: the derived ordering compares date first.
    date: NaiveDate,
    time: NaiveTime,
}

impl FerryTime {
    /// Create a new FerryTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse a time from "HH:MM" format on the given date.
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        Ok(Self::new(date, parse_clock(s)?))
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Add a duration, advancing the date when midnight is crossed.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_add_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }
}

impl From<NaiveDateTime> for FerryTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self::new(dt.date(), dt.time())
    }
}

impl fmt::Debug for FerryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FerryTime({} {:02}:{:02})",
            self.date,
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for FerryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
