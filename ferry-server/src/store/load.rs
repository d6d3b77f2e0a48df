//! Loading the store from a JSON timetable document.

use std::path::Path;

use tracing::info;

use super::error::{LoadError, StoreError};
use super::memory::MemoryStore;
use super::records::TimetableFile;

impl MemoryStore {
    /// Read and validate a timetable document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&json)?;

        let counts = store.counts();
        info!(
            path = %path.display(),
            stops = counts.stops,
            routes = counts.routes,
            frequencies = counts.frequencies,
            exceptions = counts.exceptions,
            "loaded timetable"
        );
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: TimetableFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Build a store from a parsed document.
    ///
    /// Records are added so that every reference points backwards: notices,
    /// stops and seasons first, then routes, frequencies and exceptions. The
    /// first rejected record aborts the load.
    pub fn from_file(file: TimetableFile) -> Result<Self, LoadError> {
        let store = Self::new();

        for notice in file.notices {
            store.upsert_notice(notice);
        }
        for record in file.stops {
            let id = record.id;
            store
                .add_stop_record(record)
                .map_err(rejected("stop", id))?;
        }
        for record in file.seasons {
            let id = record.id;
            store
                .add_season_record(record)
                .map_err(rejected("season", id))?;
        }
        for record in file.routes {
            let id = record.id;
            store
                .add_route_record(record)
                .map_err(rejected("route", id))?;
        }
        for record in file.frequencies {
            let id = record.id;
            store
                .add_frequency_record(record)
                .map_err(rejected("frequency", id))?;
        }
        for (index, record) in file.exceptions.into_iter().enumerate() {
            let label = match record.id {
                Some(id) => id.to_string(),
                None => format!("#{}", index + 1),
            };
            store
                .add_exception_record(record)
                .map_err(rejected("exception", label))?;
        }

        Ok(store)
    }
}

fn rejected(
    kind: &'static str,
    id: impl std::fmt::Display,
) -> impl FnOnce(StoreError) -> LoadError {
    move |source| LoadError::Record {
        record: format!("{kind} {id}"),
        source,
    }
}
