//! Departure engine configuration.

use chrono::Duration;

/// Configuration parameters for departure queries.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How far a DELAYED exception pushes its departure back (minutes).
    ///
    /// Exceptions carry no delay amount of their own, so every delayed
    /// sailing is shifted by this value.
    pub delay_minutes: u32,
}

impl EngineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(delay_minutes: u32) -> Self {
        Self { delay_minutes }
    }

    /// Returns the delay as a Duration.
    pub fn delay(&self) -> Duration {
        Duration::minutes(i64::from(self.delay_minutes))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { delay_minutes: 5 }
    }
}
