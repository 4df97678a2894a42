//! Driving route entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Waypoint;
use crate::errors::DomainError;

/// Minimum number of waypoints a route is made of
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// A calculated driving route through an ordered list of waypoints
///
/// Routes are never mutated after construction; a new calculation
/// produces a new `Route` with a fresh id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique route identifier
    pub id: String,
    /// Waypoints exactly as supplied by the caller
    pub waypoints: Vec<Waypoint>,
    /// Total distance in miles
    pub distance: f64,
    /// Total driving time in minutes
    pub duration: f64,
    /// Encoded path geometry (Google polyline, precision 5)
    pub polyline: String,
    /// Elevation profile along the path, if the provider returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Vec<f64>>,
}

impl Route {
    /// Build a route with a freshly generated id
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if fewer than two waypoints are given.
    pub fn new(
        waypoints: Vec<Waypoint>,
        distance: f64,
        duration: f64,
        polyline: impl Into<String>,
    ) -> Result<Self, DomainError> {
        ensure_routable(&waypoints)?;
        Ok(Self {
            id: Self::generate_id(),
            waypoints,
            distance,
            duration,
            polyline: polyline.into(),
            elevation: None,
        })
    }

    /// Attach an elevation profile
    #[must_use]
    pub fn with_elevation(mut self, elevation: Option<Vec<f64>>) -> Self {
        self.elevation = elevation;
        self
    }

    /// Copy of this route under a new id with different totals
    #[must_use]
    pub fn variation(&self, distance: f64, duration: f64) -> Self {
        Self {
            id: Self::generate_id(),
            distance,
            duration,
            ..self.clone()
        }
    }

    /// Generate a new unique route id
    #[must_use]
    pub fn generate_id() -> String {
        format!("route_{}", Uuid::new_v4().simple())
    }
}

/// Check that a waypoint list can be routed
///
/// # Errors
///
/// Returns `DomainError::ValidationError` if fewer than two waypoints are given.
pub fn ensure_routable(waypoints: &[Waypoint]) -> Result<(), DomainError> {
    if waypoints.len() < MIN_ROUTE_WAYPOINTS {
        return Err(DomainError::ValidationError(format!(
            "At least {MIN_ROUTE_WAYPOINTS} waypoints are required for routing, got {}",
            waypoints.len()
        )));
    }
    Ok(())
}
