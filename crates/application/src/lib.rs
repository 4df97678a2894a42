//! Application layer for Roadtripper
//!
//! Orchestrates the routing and POI clients into the trip-planning use
//! cases: building a route, browsing points of interest and tracking the
//! trip being planned with its estimated cost.

pub mod config;
pub mod error;
pub mod services;

pub use config::AppConfig;
pub use error::ApplicationError;
pub use services::*;
