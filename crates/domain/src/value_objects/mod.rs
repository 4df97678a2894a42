//! Value Objects - Immutable, identity-less domain primitives

mod geo_point;
mod poi_category;

pub use geo_point::{EARTH_RADIUS_MILES, GeoPoint, InvalidCoordinates};
pub use poi_category::{PoiCategory, UnknownCategory};
