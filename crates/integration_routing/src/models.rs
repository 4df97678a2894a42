//! OpenRouteService request and response models

use std::fmt;

use domain::Waypoint;
use serde::{Deserialize, Serialize};

/// Vehicle profile a route is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoutingProfile {
    /// Passenger car
    #[default]
    #[serde(rename = "driving-car")]
    DrivingCar,
    /// Heavy goods vehicle (RVs and trailers)
    #[serde(rename = "driving-hgv")]
    DrivingHgv,
}

impl RoutingProfile {
    /// Path segment used by the directions endpoint
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DrivingCar => "driving-car",
            Self::DrivingHgv => "driving-hgv",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a directions request
#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequest {
    /// `[lng, lat]` pairs in travel order
    pub coordinates: Vec<[f64; 2]>,
    /// Snapping radius per coordinate, -1 for unlimited
    pub radiuses: Vec<i32>,
    /// Turn-by-turn instructions
    pub instructions: bool,
    /// Request an elevation profile
    pub elevation: bool,
    /// Extra per-segment attributes
    pub extra_info: Vec<String>,
    /// Routing options
    pub options: DirectionsOptions,
}

/// Routing options sent with every request
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectionsOptions {
    /// Road features to avoid (none by default)
    pub avoid_features: Vec<String>,
}

impl DirectionsRequest {
    /// Build the request for a waypoint list
    #[must_use]
    pub fn for_waypoints(waypoints: &[Waypoint]) -> Self {
        Self {
            coordinates: waypoints.iter().map(|w| [w.lng(), w.lat()]).collect(),
            radiuses: vec![-1; waypoints.len()],
            instructions: false,
            elevation: true,
            extra_info: vec!["waytype".to_string(), "steepness".to_string()],
            options: DirectionsOptions::default(),
        }
    }
}

// ============================================================================
// Raw provider response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub summary: RawSummary,
    #[serde(default)]
    pub geometry: String,
    #[serde(default)]
    pub elevation: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSummary {
    /// Meters
    #[serde(default)]
    pub distance: f64,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::GeoPoint;

    #[test]
    fn test_profile_serde_names() {
        assert_eq!(
            serde_json::to_string(&RoutingProfile::DrivingHgv).unwrap(),
            "\"driving-hgv\""
        );
        let profile: RoutingProfile = serde_json::from_str("\"driving-car\"").unwrap();
        assert_eq!(profile, RoutingProfile::DrivingCar);
        assert_eq!(RoutingProfile::DrivingHgv.to_string(), "driving-hgv");
    }

    #[test]
    fn test_request_uses_lng_lat_order() {
        let waypoints = vec![
            Waypoint::new("1", "Las Vegas", GeoPoint::las_vegas()),
            Waypoint::new("2", "Phoenix", GeoPoint::phoenix()),
        ];
        let request = DirectionsRequest::for_waypoints(&waypoints);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["coordinates"][0][0], -115.1398);
        assert_eq!(json["coordinates"][0][1], 36.1699);
        assert_eq!(json["radiuses"], serde_json::json!([-1, -1]));
        assert_eq!(json["instructions"], false);
        assert_eq!(json["elevation"], true);
        assert_eq!(json["extra_info"], serde_json::json!(["waytype", "steepness"]));
        assert_eq!(json["options"]["avoid_features"], serde_json::json!([]));
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: DirectionsResponse =
            serde_json::from_str(r#"{"routes":[{"summary":{}}]}"#).unwrap();
        assert_eq!(response.routes.len(), 1);
        assert!(response.routes[0].geometry.is_empty());
        assert!(response.routes[0].elevation.is_none());
    }
}
