//! Point-of-interest integration for Roadtripper
//!
//! Discovers national parks, campgrounds, restaurants and other stops near
//! a location through an [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API)
//! interpreter, falling back to generated POIs whenever the service cannot
//! answer.
//!
//! # Architecture
//!
//! [`PoiClient`] defines the interface used by the application layer,
//! implemented by [`OverpassPoiClient`]. The category tables in [`query`]
//! drive both query construction ([`build_query`]) and classification of
//! returned elements ([`map_category`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{GeoPoint, PoiCategory};
//! use integration_poi::{OverpassPoiClient, PoiClient, PoiConfig, PoiSearch};
//!
//! let client = OverpassPoiClient::new(&PoiConfig::default())?;
//! let search = PoiSearch::around(GeoPoint::las_vegas())
//!     .with_radius(25_000)
//!     .with_categories([PoiCategory::Camping, PoiCategory::Fuel]);
//! let pois = client.discover_pois(&search).await?;
//! ```

mod category;
mod client;
mod config;
mod error;
mod fallback;
mod models;
pub mod query;

pub use category::map_category;
pub use client::{OverpassPoiClient, PoiClient};
pub use config::PoiConfig;
pub use error::PoiError;
pub use fallback::{MOCK_JITTER_DEGREES, mock_names, mock_pois};
pub use models::PoiSearch;
pub use query::{TagFilter, build_query, clauses_for};
