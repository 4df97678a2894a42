//! Overpass API POI client
//!
//! Discovers points of interest with an Overpass QL query sent as a
//! form-encoded POST. Any failure past input validation is answered with
//! locally generated POIs.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoPoint, PoiCategory, PointOfInterest};
use infrastructure::{RateLimiter, RetryPolicy, retry};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::category::map_category;
use crate::config::PoiConfig;
use crate::error::PoiError;
use crate::fallback::mock_pois;
use crate::models::{OverpassResponse, PoiSearch};
use crate::query::build_query;

const UNNAMED_POI: &str = "Unnamed POI";
const DEFAULT_DESCRIPTION: &str = "Point of interest in the Southwest USA.";

/// Trait for POI discovery clients
#[async_trait]
pub trait PoiClient: Send + Sync {
    /// Discover points of interest around a location
    ///
    /// Fails only for a zero radius. Service failures are replaced by
    /// generated POIs for the requested categories.
    async fn discover_pois(&self, search: &PoiSearch) -> Result<Vec<PointOfInterest>, PoiError>;
}

/// POI client backed by an Overpass interpreter
pub struct OverpassPoiClient {
    client: Client,
    config: PoiConfig,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
    rng: Mutex<StdRng>,
}

impl fmt::Debug for OverpassPoiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverpassPoiClient")
            .field("config", &self.config)
            .field("rate_limiter", &self.rate_limiter)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl OverpassPoiClient {
    /// Create a new Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &PoiConfig) -> Result<Self, PoiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Roadtripper/1.0")
            .build()
            .map_err(|e| PoiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            rate_limiter: RateLimiter::from_millis(config.min_request_interval_ms),
            retry_policy: config.retry_policy(),
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Use a fixed seed for ratings and mock positions
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Query Overpass for POIs
    ///
    /// Rate limited and retried on 429. Unlike
    /// [`PoiClient::discover_pois`] the service error is returned instead
    /// of being replaced by generated POIs.
    ///
    /// # Errors
    ///
    /// Returns `PoiError::Validation` for a zero radius, or the last
    /// provider, transport or decode error.
    #[instrument(skip(self, categories), fields(categories = categories.len()))]
    pub async fn request_pois(
        &self,
        location: &GeoPoint,
        radius_m: u32,
        categories: &[PoiCategory],
    ) -> Result<Vec<PointOfInterest>, PoiError> {
        validate_radius(radius_m)?;

        let query = build_query(location, radius_m, categories, self.config.query_timeout_secs);

        retry(&self.retry_policy, || {
            let query = query.as_str();
            async move {
                self.rate_limiter.acquire().await;
                self.send_query(query).await
            }
        })
        .await
    }

    /// Generate POIs locally, without contacting the service
    #[must_use]
    pub fn mock_pois(&self, location: &GeoPoint, categories: &[PoiCategory]) -> Vec<PointOfInterest> {
        let mut rng = self.rng.lock();
        mock_pois(
            location,
            categories,
            self.config.mock_results_per_category,
            &mut *rng,
        )
    }

    /// One interpreter request, no retry
    async fn send_query(&self, query: &str) -> Result<Vec<PointOfInterest>, PoiError> {
        debug!(endpoint = %self.config.endpoint, "Sending Overpass query");

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PoiError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    PoiError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PoiError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PoiError::Transport(e.to_string()))?;

        let pois = {
            let mut rng = self.rng.lock();
            Self::parse_overpass_response(&body, &mut *rng)?
        };

        debug!(count = pois.len(), "Overpass elements received");
        Ok(pois)
    }

    /// Convert interpreter output to POIs
    ///
    /// Elements without coordinates (ways, relations) are skipped.
    fn parse_overpass_response<R: Rng + ?Sized>(
        body: &str,
        rng: &mut R,
    ) -> Result<Vec<PointOfInterest>, PoiError> {
        let raw: OverpassResponse =
            serde_json::from_str(body).map_err(|e| PoiError::Decode(e.to_string()))?;

        let pois = raw
            .elements
            .into_iter()
            .filter_map(|element| {
                let (Some(lat), Some(lng)) = (element.lat, element.lon) else {
                    return None;
                };
                let category = map_category(&element.tags);
                let mut tags = element.tags;

                Some(PointOfInterest {
                    id: element.id.to_string(),
                    name: tags
                        .remove("name")
                        .unwrap_or_else(|| UNNAMED_POI.to_string()),
                    lat,
                    lng,
                    category,
                    rating: Some(rng.random::<f64>().mul_add(2.0, 3.0)),
                    description: Some(
                        tags.remove("description")
                            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                    ),
                    website: tags.remove("website"),
                })
            })
            .collect();

        Ok(pois)
    }
}

fn validate_radius(radius_m: u32) -> Result<(), PoiError> {
    if radius_m == 0 {
        return Err(PoiError::Validation(
            "search radius must be greater than 0 meters".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PoiClient for OverpassPoiClient {
    #[instrument(skip(self, search), fields(location = %search.location))]
    async fn discover_pois(&self, search: &PoiSearch) -> Result<Vec<PointOfInterest>, PoiError> {
        let radius_m = search.radius_m.unwrap_or(self.config.default_radius_m);
        validate_radius(radius_m)?;

        let categories = search.categories_or_default();
        if categories.is_empty() {
            debug!("No categories requested");
            return Ok(Vec::new());
        }

        match self.request_pois(&search.location, radius_m, &categories).await {
            Ok(pois) => {
                info!(count = pois.len(), radius_m, "POIs discovered");
                Ok(pois)
            },
            Err(e) => {
                warn!(error = %e, "Overpass request failed, using generated POIs");
                Ok(self.mock_pois(&search.location, &categories))
            },
        }
    }
}
