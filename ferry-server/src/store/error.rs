//! Reference store error types.

use std::path::PathBuf;

use crate::domain::{DomainError, NoticeId, RouteId, SeasonId, StopId, TimeError};

/// Errors from writing to the reference store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// A record references a stop that does not exist
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// A record references a route that does not exist
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),

    /// A record references a season that does not exist
    #[error("unknown season {0}")]
    UnknownSeason(SeasonId),

    /// A record references a notice that does not exist
    #[error("unknown notice {0}")]
    UnknownNotice(NoticeId),

    /// A clock-time field is not "HH:MM"
    #[error("{field}: {source}")]
    Time {
        field: &'static str,
        #[source]
        source: TimeError,
    },

    /// Every exception id up to the maximum is taken
    #[error("no exception id left to assign")]
    ExceptionIdsExhausted,

    /// The record failed validation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors from loading a reference data file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid timetable document
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record in the file was rejected
    #[error("{record}: {source}")]
    Record {
        record: String,
        #[source]
        source: StoreError,
    },
}
