//! Minimum-interval rate limiter
//!
//! Each client owns one limiter. Before every outbound request the client
//! calls [`RateLimiter::acquire`], which sleeps until at least
//! `min_interval` has passed since the previous request and then stamps
//! the current time.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum delay between consecutive requests
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter that has not sent any request yet
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::const_new(None),
        }
    }

    /// Create a limiter from a millisecond interval
    #[must_use]
    pub const fn from_millis(min_interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_interval_ms))
    }

    /// The configured minimum interval
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request may be sent, then record it as sent
    ///
    /// Returns how long the caller was held back. The lock is held across
    /// the sleep, so concurrent callers on the same limiter are spaced out
    /// one after another.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_request.lock().await;

        let wait = last.map_or(Duration::ZERO, |previous| {
            self.min_interval.saturating_sub(previous.elapsed())
        });

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate limiting request");
            tokio::time::sleep(wait).await;
        }

        *last = Some(Instant::now());
        wait
    }
}
