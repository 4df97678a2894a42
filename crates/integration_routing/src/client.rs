//! OpenRouteService directions client
//!
//! Requests driving routes from the
//! [OpenRouteService](https://openrouteservice.org) v2 directions API and
//! falls back to a local estimate whenever the provider cannot answer.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::{Route, Waypoint, ensure_routable};
use infrastructure::{RateLimiter, RetryPolicy, retry};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, info, instrument, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::estimate::{estimate_route, vary_route};
use crate::models::{DirectionsRequest, DirectionsResponse, RoutingProfile};

const METERS_PER_MILE: f64 = 1609.344;

/// Trait for driving-route clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Calculate a route through the waypoints, in order
    ///
    /// Fails only for fewer than two waypoints. Provider failures are
    /// replaced by a local estimate.
    async fn calculate_route(&self, waypoints: &[Waypoint]) -> Result<Route, RoutingError>;

    /// Collect exactly `max_alternatives` routes through the waypoints
    ///
    /// Provider routes for each configured profile come first; the rest are
    /// variations of the local estimate.
    async fn route_alternatives(
        &self,
        waypoints: &[Waypoint],
        max_alternatives: usize,
    ) -> Result<Vec<Route>, RoutingError>;
}

/// Routing client backed by the OpenRouteService directions API
pub struct OpenRouteServiceClient {
    client: Client,
    config: RoutingConfig,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
    rng: Mutex<StdRng>,
}

impl fmt::Debug for OpenRouteServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouteServiceClient")
            .field("config", &self.config)
            .field("rate_limiter", &self.rate_limiter)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl OpenRouteServiceClient {
    /// Create a new OpenRouteService client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Roadtripper/1.0")
            .build()
            .map_err(|e| RoutingError::Configuration(e.to_string()))?;

        if !config.has_api_key() {
            warn!("No OpenRouteService API key configured, routes will be estimated locally");
        }

        Ok(Self {
            client,
            config: config.clone(),
            rate_limiter: RateLimiter::from_millis(config.min_request_interval_ms),
            retry_policy: config.retry_policy(),
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Use a fixed seed for alternative variations
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Request a route from the provider for one profile
    ///
    /// Rate limited and retried on 429. Unlike
    /// [`RoutingClient::calculate_route`] the provider error is returned
    /// instead of being replaced by an estimate.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::Validation` for fewer than two waypoints, or
    /// the last provider, transport or decode error.
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len(), profile = %profile))]
    pub async fn request_route(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<Route, RoutingError> {
        ensure_routable(waypoints)?;

        retry(&self.retry_policy, || async move {
            self.rate_limiter.acquire().await;
            self.send_directions(waypoints, profile).await
        })
        .await
    }

    /// Estimate a route locally, without contacting the provider
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::Validation` for fewer than two waypoints.
    pub fn estimate_route(&self, waypoints: &[Waypoint]) -> Result<Route, RoutingError> {
        estimate_route(waypoints, self.config.average_speed_mph)
    }

    /// One directions request, no retry
    async fn send_directions(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<Route, RoutingError> {
        let url = format!("{}/directions/{}", self.config.base_url, profile.as_str());
        let request = DirectionsRequest::for_waypoints(waypoints);

        debug!(?url, "Requesting directions");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.config.api_key)
            .header(
                ACCEPT,
                "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8",
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        Self::parse_directions_response(&body, waypoints)
    }

    /// Convert the first route of a directions response
    fn parse_directions_response(body: &str, waypoints: &[Waypoint]) -> Result<Route, RoutingError> {
        let raw: DirectionsResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::Decode(e.to_string()))?;

        let first = raw
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::Decode("response contains no routes".to_string()))?;

        let route = Route::new(
            waypoints.to_vec(),
            (first.summary.distance / METERS_PER_MILE).round(),
            (first.summary.duration / 60.0).round(),
            first.geometry,
        )?
        .with_elevation(first.elevation);

        debug!(
            distance_mi = route.distance,
            duration_min = route.duration,
            "Directions received"
        );
        Ok(route)
    }

    /// Pad with variations of the local estimate
    fn synthesize_alternatives(&self, base: &Route, count: usize) -> Vec<Route> {
        let mut rng = self.rng.lock();
        (0..count).map(|_| vary_route(base, &mut *rng)).collect()
    }
}

#[async_trait]
impl RoutingClient for OpenRouteServiceClient {
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    async fn calculate_route(&self, waypoints: &[Waypoint]) -> Result<Route, RoutingError> {
        ensure_routable(waypoints)?;

        if !self.config.has_api_key() {
            debug!("No routing API key configured, using local estimate");
            return self.estimate_route(waypoints);
        }

        match self.request_route(waypoints, self.config.default_profile).await {
            Ok(route) => Ok(route),
            Err(e) => {
                warn!(error = %e, "Directions request failed, using local estimate");
                self.estimate_route(waypoints)
            },
        }
    }

    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    async fn route_alternatives(
        &self,
        waypoints: &[Waypoint],
        max_alternatives: usize,
    ) -> Result<Vec<Route>, RoutingError> {
        ensure_routable(waypoints)?;

        let mut routes = Vec::with_capacity(max_alternatives);
        let profiles: &[RoutingProfile] = if self.config.has_api_key() {
            self.config.alternative_profiles.as_slice()
        } else {
            &[]
        };
        for profile in profiles.iter().take(max_alternatives) {
            match self.request_route(waypoints, *profile).await {
                Ok(route) => routes.push(route),
                Err(e) => warn!(profile = %profile, error = %e, "Skipping alternative profile"),
            }
        }

        let missing = max_alternatives.saturating_sub(routes.len());
        if missing > 0 {
            let base = self.estimate_route(waypoints)?;
            routes.extend(self.synthesize_alternatives(&base, missing));
        }

        info!(
            count = routes.len(),
            synthesized = missing,
            "Route alternatives ready"
        );
        Ok(routes)
    }
}
