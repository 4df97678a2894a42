//! Driving-route integration for Roadtripper
//!
//! Provides driving directions via the
//! [OpenRouteService](https://openrouteservice.org) directions API, with a
//! local great-circle estimate whenever the provider is unreachable, rate
//! limited past the retry ceiling, or returns something unusable.
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface used by the application layer,
//! implemented by [`OpenRouteServiceClient`]. Requests go through a
//! per-client [`infrastructure::RateLimiter`] and are retried with
//! exponential backoff on HTTP 429 only. Route geometry uses the encoded
//! polyline format, see [`encode_polyline`] and [`decode_polyline`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{OpenRouteServiceClient, RoutingClient, RoutingConfig};
//!
//! let client = OpenRouteServiceClient::new(&RoutingConfig::default())?;
//! let route = client.calculate_route(&waypoints).await?;
//! let path = integration_routing::decode_polyline(&route.polyline)?;
//! ```

mod client;
mod config;
mod error;
mod estimate;
mod models;
mod polyline;

pub use client::{OpenRouteServiceClient, RoutingClient};
pub use config::RoutingConfig;
pub use error::RoutingError;
pub use estimate::{calculate_distance, estimate_route, vary_route};
pub use models::{DirectionsOptions, DirectionsRequest, RoutingProfile};
pub use polyline::{decode_polyline, encode_polyline};
