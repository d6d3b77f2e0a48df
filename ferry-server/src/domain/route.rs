//! Route topology.
//!
//! A route is an ordered sequence of stops. Each stop carries its cumulative
//! sailing time from the first stop and the distance from the stop before it,
//! which is all the engine needs to turn a route-relative departure
//! clock-time into stop-to-stop departure and arrival times.

use chrono::Duration;

use super::{DomainError, RouteId, StopId};

/// One stop on a route, with its position and offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    stop: StopId,
    order: u32,
    minutes_from_start: u32,
    distance_from_previous_km: f64,
}

impl RouteStop {
    /// Create a route stop.
    ///
    /// Offsets are taken as signed values so that negative input from
    /// external data can be rejected rather than silently wrapped.
    pub fn new(
        route: RouteId,
        stop: StopId,
        order: u32,
        minutes_from_start: i64,
        distance_from_previous_km: f64,
    ) -> Result<Self, DomainError> {
        let minutes_from_start =
            u32::try_from(minutes_from_start).map_err(|_| DomainError::NegativeOffset {
                route,
                stop,
                field: "time from start",
            })?;
        if distance_from_previous_km.is_nan() || distance_from_previous_km < 0.0 {
            return Err(DomainError::NegativeOffset {
                route,
                stop,
                field: "distance from previous",
            });
        }

        Ok(Self {
            stop,
            order,
            minutes_from_start,
            distance_from_previous_km,
        })
    }

    pub fn stop(&self) -> StopId {
        self.stop
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn minutes_from_start(&self) -> u32 {
        self.minutes_from_start
    }

    pub fn distance_from_previous_km(&self) -> f64 {
        self.distance_from_previous_km
    }
}

/// A ferry route with its resolved stop topology.
///
/// # Examples
///
/// ```
/// use ferry_server::domain::{Route, RouteId, RouteStop, StopId};
///
/// let r = RouteId(1);
/// let route = Route::new(
///     r,
///     "B10",
///     vec![
///         RouteStop::new(r, StopId(1), 1, 0, 0.0).unwrap(),
///         RouteStop::new(r, StopId(2), 2, 20, 6.5).unwrap(),
///         RouteStop::new(r, StopId(3), 3, 45, 9.0).unwrap(),
///     ],
///     true,
/// )
/// .unwrap();
///
/// assert!(route.in_order(StopId(1), StopId(3)));
/// assert!(!route.in_order(StopId(3), StopId(1)));
/// assert_eq!(route.offset_minutes(StopId(2)), 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteId,
    number: String,
    stops: Vec<RouteStop>,
    active: bool,
}

impl Route {
    /// Create a route.
    ///
    /// Stops are sorted by their route order, which must then read
    /// 1, 2, ... strictly increasing.
    pub fn new(
        id: RouteId,
        number: impl Into<String>,
        mut stops: Vec<RouteStop>,
        active: bool,
    ) -> Result<Self, DomainError> {
        stops.sort_by_key(RouteStop::order);

        if stops.first().is_some_and(|first| first.order != 1) {
            return Err(DomainError::InvalidRouteOrder {
                route: id,
                reason: "route order must start at 1",
            });
        }
        if stops.windows(2).any(|pair| pair[0].order >= pair[1].order) {
            return Err(DomainError::InvalidRouteOrder {
                route: id,
                reason: "route order must be strictly increasing",
            });
        }

        Ok(Self {
            id,
            number: number.into(),
            stops,
            active,
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Public route number, e.g. "B10".
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Stops in route order.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the first occurrence of `stop` in the route.
    pub fn position(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|s| s.stop == stop)
    }

    /// True if the route serves both stops and `from` comes before `to`.
    pub fn in_order(&self, from: StopId, to: StopId) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(f), Some(t)) => f < t,
            _ => false,
        }
    }

    /// Minutes from the route's first stop to `stop`.
    ///
    /// Returns 0 for a stop the route does not serve.
    pub fn offset_minutes(&self, stop: StopId) -> u32 {
        self.position(stop)
            .map(|i| self.stops[i].minutes_from_start)
            .unwrap_or(0)
    }

    /// [`Route::offset_minutes`] as a Duration.
    pub fn offset(&self, stop: StopId) -> Duration {
        Duration::minutes(i64::from(self.offset_minutes(stop)))
    }

    /// Distance sailed between two stops, if `from` precedes `to`.
    pub fn distance_km(&self, from: StopId, to: StopId) -> Option<f64> {
        let (f, t) = (self.position(from)?, self.position(to)?);
        if f >= t {
            return None;
        }
        Some(
            self.stops[f + 1..=t]
                .iter()
                .map(|s| s.distance_from_previous_km)
                .sum(),
        )
    }
}
