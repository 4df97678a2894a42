//! Retry logic with exponential backoff
//!
//! Provides the retry loop shared by the routing and POI clients: an
//! operation is retried only while it fails with an error that reports
//! itself as retryable (a rate-limited response), sleeping an exponentially
//! growing delay between attempts. Any other error is returned at once.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryPolicy, retry};
//!
//! let policy = RetryPolicy::default();
//! let result = retry(&policy, || async {
//!     provider.call().await
//! }).await;
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Backoff policy for rate-limited requests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base in milliseconds (default: 1000ms)
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Growth factor per retry (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Upper bound for a single delay in milliseconds (default: 60000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_base_delay() -> u64 {
    1000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_delay() -> u64 {
    60_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl RetryPolicy {
    /// Create a doubling policy with the given retry ceiling and base delay
    #[must_use]
    pub const fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            multiplier: 2.0,
            max_delay_ms: 60_000,
        }
    }

    /// A policy that never retries
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(0, 0)
    }

    /// Delay to wait before the given retry (1-indexed)
    ///
    /// delay = base_delay * multiplier^retry, capped at max_delay, so with
    /// the defaults the retries wait 2s, 4s and 8s.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.min(i32::MAX as u32) as i32;
        let delay = (self.base_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = delay.min(self.max_delay_ms as f64).max(0.0);

        Duration::from_millis(capped as u64)
    }
}

/// Trait for errors that can be checked for retryability
pub trait Retryable {
    /// Returns true if the failed operation may be attempted again
    fn is_retryable(&self) -> bool;
}

/// Retry result containing either success or the last error
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// The result of the operation
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries, 2 = one retry, etc.)
    pub attempts: u32,
    /// Total time spent including backoff sleeps
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// Check if the operation succeeded
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the operation failed
    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.result.is_err()
    }

    /// Convert to standard Result, discarding metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Execute an async operation with retry logic
///
/// The operation is invoked once, then again after each retryable failure
/// until it succeeds, fails with a non-retryable error, or the retry
/// ceiling is reached. The last error is returned unchanged.
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(
                        attempts = attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retries"
                    );
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                };
            },
            Err(err) => {
                if !err.is_retryable() {
                    debug!(
                        attempts = attempts,
                        error = %err,
                        "Operation failed with non-retryable error"
                    );
                    return RetryResult {
                        result: Err(err),
                        attempts,
                        total_duration: start.elapsed(),
                    };
                }

                let retry = attempts;
                if retry > policy.max_retries {
                    warn!(
                        attempts = attempts,
                        max_retries = policy.max_retries,
                        error = %err,
                        "Operation still rate limited after max retries"
                    );
                    return RetryResult {
                        result: Err(err),
                        attempts,
                        total_duration: start.elapsed(),
                    };
                }

                let delay = policy.delay_for_retry(retry);
                warn!(
                    retry = retry,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Rate limited, backing off"
                );

                tokio::time::sleep(delay).await;
            },
        }
    }
}

/// Execute an async operation with retry logic, returning only the Result
///
/// This is a convenience wrapper around `with_retry` that discards metadata.
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(policy, operation).await.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Clone)]
    struct TestError {
        message: String,
        retryable: bool,
    }

    impl TestError {
        fn rate_limited() -> Self {
            Self {
                message: "HTTP 429".to_string(),
                retryable: true,
            }
        }

        fn permanent() -> Self {
            Self {
                message: "HTTP 500".to_string(),
                retryable: false,
            }
        }
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[test]
    fn policy_default_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 1000);
        assert!((policy.multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn delay_doubles_each_retry() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_retry(1).as_millis(), 2000);
        assert_eq!(policy.delay_for_retry(2).as_millis(), 4000);
        assert_eq!(policy.delay_for_retry(3).as_millis(), 8000);
    }

    #[test]
    fn delay_capped_at_max() {
        let policy = RetryPolicy {
            max_delay_ms: 5000,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.delay_for_retry(3).as_millis(), 5000);
        assert_eq!(policy.delay_for_retry(u32::MAX).as_millis(), 5000);
    }

    #[test]
    fn policy_deserialization_fills_defaults() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"base_delay_ms":50}"#).unwrap();
        assert_eq!(policy.base_delay_ms, 50);
        assert_eq!(policy.max_retries, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));

        let result = with_retry(&RetryPolicy::default(), || {
            let count = Arc::clone(&call_count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(42)
            }
        })
        .await;

        assert_eq!(result.attempts, 1);
        assert_eq!(result.result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_twice_then_success() {
        let call_count = Arc::new(AtomicU32::new(0));
        let started = Instant::now();
        let calls_at = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let result = with_retry(&RetryPolicy::default(), || {
            let count = Arc::clone(&call_count);
            let calls_at = Arc::clone(&calls_at);
            async move {
                calls_at.lock().push(started.elapsed());
                if count.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(TestError::rate_limited())
                } else {
                    Ok("route")
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(result.attempts, 3);

        let calls_at = calls_at.lock().clone();
        assert_eq!(calls_at.len(), 3);
        assert!(calls_at[1] - calls_at[0] >= Duration::from_secs(2));
        assert!(calls_at[2] - calls_at[0] >= Duration::from_secs(4));
        assert!(calls_at[2] - calls_at[1] >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_returns_immediately() {
        let call_count = Arc::new(AtomicU32::new(0));

        let result = with_retry(&RetryPolicy::default(), || {
            let count = Arc::clone(&call_count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::permanent())
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.total_duration, Duration::ZERO);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_retry_ceiling() {
        let call_count = Arc::new(AtomicU32::new(0));

        let result = with_retry(&RetryPolicy::default(), || {
            let count = Arc::clone(&call_count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::rate_limited())
            }
        })
        .await;

        assert!(result.is_err());
        // 1 initial + 3 retries
        assert_eq!(result.attempts, 4);
        assert_eq!(call_count.load(Ordering::SeqCst), 4);
        // 2s + 4s + 8s of backoff
        assert!(result.total_duration >= Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn no_retry_policy_stops_after_one_attempt() {
        let result: Result<i32, TestError> =
            retry(&RetryPolicy::no_retry(), || async { Err(TestError::rate_limited()) }).await;

        assert!(result.unwrap_err().is_retryable());
    }
}
