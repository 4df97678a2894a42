//! Geographic point value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in miles, used for great-circle distances
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A geographic point with latitude and longitude in decimal degrees
///
/// Deserialization applies the same range check as [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lng: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinates);
        }
        Ok(Self { lat, lng })
    }

    /// Create a point without validation (for trusted sources such as
    /// provider responses and decoded geometry)
    #[must_use]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to another point in miles
    ///
    /// Uses the Haversine formula with a mean Earth radius of 3959 miles.
    #[must_use]
    pub fn distance_miles(&self, other: &Self) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lng / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_MILES * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Well-known Southwest locations
impl GeoPoint {
    /// Las Vegas, NV
    #[must_use]
    pub const fn las_vegas() -> Self {
        Self::new_unchecked(36.1699, -115.1398)
    }

    /// Phoenix, AZ
    #[must_use]
    pub const fn phoenix() -> Self {
        Self::new_unchecked(33.4484, -112.0740)
    }

    /// Grand Canyon Village, AZ
    #[must_use]
    pub const fn grand_canyon() -> Self {
        Self::new_unchecked(36.0544, -112.1401)
    }
}
