//! Infrastructure layer - Shared plumbing for the provider clients
//!
//! Provides the minimum-interval [`RateLimiter`], the 429 backoff loop in
//! [`retry`], and logging setup in [`telemetry`]. Both the routing and the
//! POI client are built from these pieces, each owning its own limiter.

pub mod rate_limit;
pub mod retry;
pub mod telemetry;

pub use rate_limit::RateLimiter;
pub use retry::{RetryPolicy, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_tracing};
