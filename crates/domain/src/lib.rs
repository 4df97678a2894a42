//! Domain layer for Roadtripper
//!
//! Contains the trip-planning data model: geographic points, waypoints,
//! routes, points of interest and cost estimation. This layer performs no
//! I/O; the routing and POI clients build on top of it.

pub mod cost;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use cost::{CostEstimate, CostFactors, estimate_trip_cost};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
