//! Caching layer for built day timetables.
//!
//! Expanding every route's frequencies is the only non-trivial work a
//! departure query repeats, and its result depends solely on the date and
//! the reference data. Entries are keyed by both, so any store write (which
//! bumps the revision) makes every older entry unreachable.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;
use tracing::trace;

use crate::timetable::{DayTimetable, Revision};

/// Cache key for timetables: (travel date, reference data revision).
type TimetableKey = (NaiveDate, Revision);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Cache of per-date timetables.
#[derive(Clone)]
pub struct TimetableCache {
    timetables: MokaCache<TimetableKey, Arc<DayTimetable>>,
}

impl TimetableCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let timetables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { timetables }
    }

    /// Get the timetable built for `date` at `revision`.
    pub fn get(&self, date: NaiveDate, revision: Revision) -> Option<Arc<DayTimetable>> {
        let hit = self.timetables.get(&(date, revision));
        trace!(%date, %revision, hit = hit.is_some(), "timetable cache lookup");
        hit
    }

    /// Store a timetable built for `date` at `revision`.
    pub fn insert(&self, date: NaiveDate, revision: Revision, timetable: Arc<DayTimetable>) {
        self.timetables.insert((date, revision), timetable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::build_day_timetable;
    use crate::timetable::fixtures::*;

    fn timetable() -> Arc<DayTimetable> {
        let data = FixtureData::scenario();
        Arc::new(build_day_timetable(&data, &[route_abc(1, "R1")], monday()).unwrap())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn hit_requires_same_date_and_revision() {
        let cache = TimetableCache::new(&CacheConfig::default());
        let entry = timetable();
        cache.insert(monday(), Revision(3), Arc::clone(&entry));

        assert_eq!(cache.get(monday(), Revision(3)), Some(entry));
        assert!(cache.get(monday(), Revision(4)).is_none());
        assert!(cache.get(monday().succ_opt().unwrap(), Revision(3)).is_none());
    }
}
