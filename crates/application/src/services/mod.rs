//! Application services
//!
//! Stateful use cases built on the routing and POI clients.

pub mod poi_explorer;
pub mod route_planner;
pub mod trip_planner;

pub use poi_explorer::{DEFAULT_ACTIVE_CATEGORIES, DEFAULT_SEARCH_RADIUS_M, PoiExplorer, PoiState};
pub use route_planner::{RoutePlanner, RouteState, RouteSummary};
pub use trip_planner::{Trip, TripPlanner};
