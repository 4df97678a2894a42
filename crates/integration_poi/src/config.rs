//! POI discovery configuration

use infrastructure::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for the Overpass POI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiConfig {
    /// Overpass interpreter endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Server-side query timeout written into the query header
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Minimum delay between two outbound requests
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Retries after a rate-limited (429) response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base; retry n waits base * 2^n
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Search radius in meters when the caller gives none
    #[serde(default = "default_radius_m")]
    pub default_radius_m: u32,

    /// Mock POIs generated per category by the fallback
    #[serde(default = "default_mock_results_per_category")]
    pub mock_results_per_category: usize,
}

fn default_endpoint() -> String {
    "https://overpass.private.coffee/api/interpreter".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_query_timeout_secs() -> u64 {
    25
}

const fn default_min_request_interval_ms() -> u64 {
    500
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_base_ms() -> u64 {
    1000
}

const fn default_radius_m() -> u32 {
    10_000
}

const fn default_mock_results_per_category() -> usize {
    3
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            default_radius_m: default_radius_m(),
            mock_results_per_category: default_mock_results_per_category(),
        }
    }
}

impl PoiConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            min_request_interval_ms: 0,
            backoff_base_ms: 10,
            ..Default::default()
        }
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
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.query_timeout_secs == 0 {
            return Err("query_timeout_secs must be greater than 0".to_string());
        }

        if self.default_radius_m == 0 {
            return Err("default_radius_m must be greater than 0".to_string());
        }

        if self.max_retries > 10 {
            return Err("max_retries must be 10 or less".to_string());
        }

        Ok(())
    }
}
