//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, TimetableCache};
use crate::store::MemoryStore;
use crate::timetable::{Clock, EngineConfig, SystemClock};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Reference data
    pub store: MemoryStore,

    /// Day timetables keyed by date and store revision
    pub cache: Arc<TimetableCache>,

    /// Departure engine configuration
    pub config: Arc<EngineConfig>,

    /// Source of "now" for NOW queries and the default date
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    /// Create a new app state using the system clock.
    pub fn new(store: MemoryStore, config: EngineConfig, cache_config: &CacheConfig) -> Self {
        Self::with_clock(store, config, cache_config, Arc::new(SystemClock))
    }

    /// Create a new app state with an explicit clock.
    pub fn with_clock(
        store: MemoryStore,
        config: EngineConfig,
        cache_config: &CacheConfig,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            store,
            cache: Arc::new(TimetableCache::new(cache_config)),
            config: Arc::new(config),
            clock,
        }
    }
}
