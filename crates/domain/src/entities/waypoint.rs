//! Trip waypoint entity

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// What kind of stop a waypoint represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    /// Sightseeing stop
    Attraction,
    /// Overnight stop
    Lodging,
    /// Refuelling stop
    Fuel,
    /// Meal stop
    Food,
    /// User-placed marker
    #[default]
    Custom,
}

/// A stop on a trip, placed by the user before routing
///
/// Identity is the caller-assigned `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Caller-assigned identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Position on the map
    #[serde(flatten)]
    pub position: GeoPoint,
    /// Kind of stop
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WaypointKind>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Planned time spent at the stop, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_stop_minutes: Option<u32>,
}

impl Waypoint {
    /// Create a waypoint with just an id, a name and a position
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            kind: None,
            description: None,
            estimated_stop_minutes: None,
        }
    }

    /// Set the kind of stop
    #[must_use]
    pub fn with_kind(mut self, kind: WaypointKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Latitude of the waypoint
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.position.lat()
    }

    /// Longitude of the waypoint
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.position.lng()
    }
}
