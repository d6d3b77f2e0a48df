//! Serialized form of the reference data.
//!
//! These records mirror the JSON timetable document field for field. They
//! are unvalidated; the store converts each one through the domain
//! constructors before accepting it.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ExceptionId, ExceptionKind, FrequencyId, Notice, NoticeId, RouteId, SeasonId, StopId,
};

/// A whole timetable document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableFile {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub seasons: Vec<SeasonRecord>,
    pub frequencies: Vec<FrequencyRecord>,
    pub exceptions: Vec<ExceptionRecord>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: StopId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: RouteId,
    pub number: String,
    #[serde(default = "active")]
    pub active: bool,
    pub stops: Vec<RouteStopRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStopRecord {
    pub stop: StopId,
    pub order: u32,
    pub minutes_from_start: i64,
    #[serde(default)]
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub id: SeasonId,
    pub kind: String,
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A recurring frequency. Times are "HH:MM".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub id: FrequencyId,
    pub route: RouteId,
    pub weekday: Weekday,
    #[serde(default)]
    pub season: Option<SeasonId>,
    pub first_departure: Option<String>,
    pub last_departure: Option<String>,
    pub interval_minutes: i64,
}

/// A schedule exception, as stored in the file or posted to the API.
///
/// Exactly one of `valid_date` and `weekday` must be set. When `id` is
/// omitted the store assigns the next free one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRecord {
    #[serde(default)]
    pub id: Option<ExceptionId>,
    pub route: RouteId,
    #[serde(default)]
    pub stop: Option<StopId>,
    #[serde(default)]
    pub valid_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekday: Option<Weekday>,
    #[serde(default)]
    pub season: Option<SeasonId>,
    pub departure_time: Option<String>,
    pub kind: ExceptionKind,
    #[serde(default = "active")]
    pub active: bool,
    #[serde(default)]
    pub notice: Option<NoticeId>,
}

fn active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let file: TimetableFile = serde_json::from_str(r#"{ "stops": [] }"#).unwrap();
        assert!(file.routes.is_empty());
        assert!(file.exceptions.is_empty());
    }

    #[test]
    fn parses_exception_with_defaults() {
        let json = r#"{
            "route": 1,
            "weekday": "Monday",
            "season": 2,
            "departure_time": "08:30",
            "kind": "CANCELLED"
        }"#;
        let record: ExceptionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.weekday, Some(Weekday::Mon));
        assert_eq!(record.kind, ExceptionKind::Cancelled);
        assert!(record.active);
        assert_eq!(record.stop, None);
    }

    #[test]
    fn rejects_unknown_kind() {
        let json = r#"{ "route": 1, "departure_time": "08:30", "kind": "POSTPONED" }"#;
        assert!(serde_json::from_str::<ExceptionRecord>(json).is_err());
    }

    #[test]
    fn weekday_accepts_short_names() {
        let json = r#"{
            "id": 1, "route": 1, "weekday": "sat",
            "first_departure": "08:00", "last_departure": "10:00",
            "interval_minutes": 60
        }"#;
        let record: FrequencyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.weekday, Weekday::Sat);
        assert_eq!(record.season, None);
    }
}
