//! HTTP route handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{ExceptionId, StopId, TimeMode, parse_clock};
use crate::store::{ExceptionRecord, MemoryStore, StoreError};
use crate::timetable::{DepartureEngine, DepartureQuery, QueryError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/departures", get(departures))
        .route("/exceptions", post(create_exception))
        .route("/exceptions/:id", delete(delete_exception))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every stop.
async fn list_stops(State(state): State<AppState>) -> Json<StopsResponse> {
    let stops = state
        .store
        .stops()
        .iter()
        .map(StopResult::from_stop)
        .collect();

    Json(StopsResponse { stops })
}

/// Resolve a stop given as a numeric id or a name.
///
/// Numeric input is taken as an id even if no such stop exists; the engine
/// then simply finds no departures.
fn resolve_stop(store: &MemoryStore, input: &str) -> Option<StopId> {
    let input = input.trim();
    match input.parse::<u32>() {
        Ok(id) => Some(StopId(id)),
        Err(_) => store.stop_by_name(input).map(|s| s.id),
    }
}

/// Departures between two stops.
async fn departures(
    State(state): State<AppState>,
    Query(req): Query<DeparturesRequest>,
) -> Result<Json<DeparturesResponse>, AppError> {
    let mode = req
        .mode
        .as_deref()
        .map(str::parse::<TimeMode>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    let date = match (mode, req.date.as_deref()) {
        (TimeMode::Now, _) | (_, None) => state.clock.now().date(),
        (_, Some(raw)) => {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
                message: format!("Invalid date: {raw} (expected YYYY-MM-DD)"),
            })?
        }
    };

    let time = req
        .time
        .as_deref()
        .map(|raw| {
            parse_clock(raw).map_err(|e| AppError::BadRequest {
                message: format!("Invalid time {raw}: {e}"),
            })
        })
        .transpose()?;

    let from = resolve_stop(&state.store, &req.from);
    let to = resolve_stop(&state.store, &req.to);

    let records = match (from, to) {
        (Some(from), Some(to)) => {
            let query = DepartureQuery::new(from, to, date, time, mode);
            DepartureEngine::new(&state.store, state.clock.as_ref(), &state.config)
                .with_cache(&state.cache)
                .compute_departures(&query)?
        }
        _ => Vec::new(),
    };

    let mut distances = HashMap::new();
    let departures = records
        .iter()
        .map(|record| {
            let distance = *distances.entry(record.route).or_insert_with(|| {
                state
                    .store
                    .route(record.route)
                    .and_then(|route| route.distance_km(record.from, record.to))
            });
            DepartureResult::from_record(record, distance)
        })
        .collect();

    let stop_result = |id: Option<StopId>| {
        id.and_then(|id| state.store.stop(id))
            .as_ref()
            .map(StopResult::from_stop)
    };

    Ok(Json(DeparturesResponse {
        from: stop_result(from),
        to: stop_result(to),
        date: date.to_string(),
        mode,
        departures,
    }))
}

/// Create a schedule exception.
async fn create_exception(
    State(state): State<AppState>,
    body: Result<Json<ExceptionRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<ExceptionResult>), AppError> {
    let Json(record) = body.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let entry = state.store.add_exception_record(record)?;
    info!(exception = %entry.id(), route = %entry.route(), "created exception");

    Ok((StatusCode::CREATED, Json(ExceptionResult::from_entry(&entry))))
}

/// Remove a schedule exception.
async fn delete_exception(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    match state.store.remove_exception(ExceptionId(id)) {
        Some(_) => {
            info!(exception = id, "deleted exception");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound {
            message: format!("No exception with id {id}"),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
