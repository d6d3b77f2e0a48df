//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DepartureRecord, ExceptionEntry, ExceptionKind, Stop, TimeMode, format_clock};

/// Query string of a departure search.
#[derive(Debug, Deserialize)]
pub struct DeparturesRequest {
    /// Boarding stop id or name
    pub from: String,

    /// Alighting stop id or name
    pub to: String,

    /// Travel date as YYYY-MM-DD (defaults to today)
    pub date: Option<String>,

    /// Time in HH:MM format (omit for the whole day)
    pub time: Option<String>,

    /// depart, arrival or now (defaults to depart)
    pub mode: Option<String>,
}

/// A stop for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct StopResult {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Response listing stops.
#[derive(Debug, Serialize, Deserialize)]
pub struct StopsResponse {
    pub stops: Vec<StopResult>,
}

/// One sailing in a departure list.
#[derive(Debug, Serialize, Deserialize)]
pub struct DepartureResult {
    pub route_id: u32,

    /// Public route number
    pub route_number: String,

    /// Date of departure from the boarding stop
    pub departure_date: String,

    /// Departure time (HH:MM)
    pub planned_departure: String,

    /// Date of arrival, later than the departure date after midnight
    pub arrival_date: String,

    /// Arrival time (HH:MM)
    pub arrival_time: String,

    pub duration_mins: i64,

    /// Distance sailed between the two stops
    pub distance_km: Option<f64>,

    /// Added by an EXTRA exception
    pub is_extra: bool,

    /// Minutes added by a DELAYED exception
    pub delay_minutes: Option<u32>,

    /// Passenger notice attached by an exception
    pub notice: Option<String>,
}

/// Response for a departure search.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeparturesResponse {
    pub from: Option<StopResult>,
    pub to: Option<StopResult>,
    pub date: String,
    pub mode: TimeMode,
    pub departures: Vec<DepartureResult>,
}

/// A stored exception, echoed back after creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExceptionResult {
    pub id: u32,
    pub route_id: u32,
    pub stop_id: Option<u32>,
    pub valid_date: Option<String>,
    pub weekday: Option<String>,
    pub departure_time: String,
    pub kind: ExceptionKind,
    pub active: bool,
    pub notice: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id.get(),
            name: stop.name.clone(),
            latitude: stop.latitude,
            longitude: stop.longitude,
        }
    }
}

impl DepartureResult {
    /// Create from a departure record and the sailing distance of its route.
    pub fn from_record(record: &DepartureRecord, distance_km: Option<f64>) -> Self {
        Self {
            route_id: record.route.get(),
            route_number: record.route_number.clone(),
            departure_date: record.planned_departure.date().to_string(),
            planned_departure: record.planned_departure.to_string(),
            arrival_date: record.arrival_time.date().to_string(),
            arrival_time: record.arrival_time.to_string(),
            duration_mins: record.duration().num_minutes(),
            distance_km,
            is_extra: record.is_extra,
            delay_minutes: record.delay_minutes,
            notice: record.notice.as_ref().map(|n| n.text.clone()),
        }
    }
}

impl ExceptionResult {
    pub fn from_entry(entry: &ExceptionEntry) -> Self {
        Self {
            id: entry.id().get(),
            route_id: entry.route().get(),
            stop_id: entry.stop().map(|s| s.get()),
            valid_date: entry.valid_date().map(|d| d.to_string()),
            weekday: entry.weekday().map(|w| w.to_string()),
            departure_time: format_clock(entry.departure_time()),
            kind: entry.kind(),
            active: entry.is_active(),
            notice: entry.notice().map(|n| n.text.clone()),
        }
    }
}
