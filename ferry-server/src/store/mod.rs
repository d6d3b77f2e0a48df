//! Reference data storage.
//!
//! The store holds stops, routes, seasons, frequencies, exceptions and
//! notices in memory and serves them to the departure engine. It is seeded
//! from a JSON timetable document and accepts exception edits at runtime.

mod error;
mod load;
mod memory;
mod records;

pub use error::{LoadError, StoreError};
pub use memory::{MemoryStore, StoreCounts};
pub use records::{
    ExceptionRecord, FrequencyRecord, RouteRecord, RouteStopRecord, SeasonRecord, StopRecord,
    TimetableFile,
};
