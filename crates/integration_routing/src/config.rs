//! Routing service configuration

use std::fmt;

use infrastructure::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::models::RoutingProfile;

/// Configuration for the OpenRouteService directions client
#[derive(Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the directions API (profile path is appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token sent in the `Authorization` header
    ///
    /// Empty by default. Without a token no directions request is sent and
    /// every route is the local estimate, which is enough for demos.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum delay between two outbound requests
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Retries after a rate-limited (429) response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base; retry n waits base * 2^n
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Average speed used by the local estimate
    #[serde(default = "default_average_speed_mph")]
    pub average_speed_mph: f64,

    /// Profile used by `calculate_route`
    #[serde(default)]
    pub default_profile: RoutingProfile,

    /// Profiles queried, in order, when looking for alternatives
    #[serde(default = "default_alternative_profiles")]
    pub alternative_profiles: Vec<RoutingProfile>,
}

fn default_base_url() -> String {
    "https://api.openrouteservice.org/v2".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_min_request_interval_ms() -> u64 {
    1000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_base_ms() -> u64 {
    1000
}

const fn default_average_speed_mph() -> f64 {
    50.0
}

fn default_alternative_profiles() -> Vec<RoutingProfile> {
    vec![RoutingProfile::DrivingCar, RoutingProfile::DrivingHgv]
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            average_speed_mph: default_average_speed_mph(),
            default_profile: RoutingProfile::default(),
            alternative_profiles: default_alternative_profiles(),
        }
    }
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "[REDACTED]" } else { "" })
            .field("timeout_secs", &self.timeout_secs)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("average_speed_mph", &self.average_speed_mph)
            .field("default_profile", &self.default_profile)
            .field("alternative_profiles", &self.alternative_profiles)
            .finish()
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            min_request_interval_ms: 0,
            backoff_base_ms: 10,
            ..Default::default()
        }
    }

    /// Check if an access token is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Backoff policy derived from this configuration
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff_base_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if !self.average_speed_mph.is_finite() || self.average_speed_mph <= 0.0 {
            return Err("average_speed_mph must be a positive number".to_string());
        }

        if self.max_retries > 10 {
            return Err("max_retries must be 10 or less".to_string());
        }

        Ok(())
    }
}
