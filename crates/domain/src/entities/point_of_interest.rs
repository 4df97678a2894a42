//! Point-of-interest entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoPoint, PoiCategory};

/// A point of interest near a search location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Provider id (stringified) or a generated mock id
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Category from the closed set
    pub category: PoiCategory,
    /// Rating from 3.0 to 5.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Website URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl PointOfInterest {
    /// Position of the point of interest
    #[must_use]
    pub const fn position(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.lat, self.lng)
    }
}
