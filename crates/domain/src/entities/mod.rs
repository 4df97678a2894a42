//! Domain entities - Objects with identity

mod point_of_interest;
mod route;
mod waypoint;

pub use point_of_interest::PointOfInterest;
pub use route::{MIN_ROUTE_WAYPOINTS, Route, ensure_routable};
pub use waypoint::{Waypoint, WaypointKind};
