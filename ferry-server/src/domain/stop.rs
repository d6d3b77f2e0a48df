//! Ferry stops.

use super::{DomainError, StopId};

/// A place where ferries call.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    /// Create a stop, rejecting coordinates outside WGS84 bounds.
    pub fn new(
        id: StopId,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        })
    }

    /// Case-insensitive name comparison used for lookups by name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}
