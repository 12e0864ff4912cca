//! Client-level tuning knobs passed to the session at build time.

use std::time::Duration;

/// Optional client-side rate limit applied before each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained request rate.
    pub requests_per_second: u32,
    /// Requests allowed to burst above the sustained rate.
    pub burst_size: u32,
}

/// Configuration for the HTTP session.
///
/// Both knobs are thin pass-throughs: `timeout` to the underlying
/// `reqwest` client, `rate_limit` to a `governor` direct limiter. There
/// is no retry policy.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Per-request timeout. `None` uses the transport library default.
    pub timeout: Option<Duration>,
    /// Client-side rate limit. `None` disables limiting.
    pub rate_limit: Option<RateLimitConfig>,
}
