//! Web layer for the ferry timetable service.
//!
//! Provides HTTP endpoints for listing stops, querying departures and
//! editing schedule exceptions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
