//! Rate limiting primitives.
//!
//! This module provides the building blocks for per-caller rate limiting:
//! - [`RateLimiter`]: The core trait the middleware asks for a verdict.
//! - [`FixedWindowLimiter`]: Fixed-window counters keyed by caller identity.
//! - [`RateLimitLayer`]: Tower middleware that rejects before the inner service runs.
//! - [`Sweeper`]: Background task that drops expired windows.
//!
//! # Architecture
//!
//! - **Middleware**: `RateLimitLayer` wraps your service. It doesn't know *how* limiting works,
//!   only that it should ask a `RateLimiter` about the request's [`Identity`].
//! - **Logic**: `FixedWindowLimiter` (in `strategies`) handles key derivation and the window math.
//! - **Storage**: `WindowStore` (in `store`) holds the counters. The bundled
//!   `InMemoryWindowStore` is process-local: horizontally scaled deployments
//!   multiply the effective limit by the instance count until a shared store
//!   is plugged in.
//!
//! Windows are fixed, not sliding. A burst straddling a window boundary can
//! admit up to `2 * max_requests` requests in a short span.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod middleware;
pub mod store;
pub mod strategies;
pub mod sweeper;

pub use config::{RateLimitConfig, RateLimitConfigError};
pub use middleware::{IdentityExtractor, RateLimitLayer, RateLimitService};
pub use store::{InMemoryWindowStore, WindowEntry, WindowStore};
pub use strategies::FixedWindowLimiter;
pub use sweeper::{Sweeper, SweeperConfig};

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Authenticated user, if any.
    pub user_id: Option<u64>,
    /// Remote address, used when the caller is anonymous.
    pub ip: String,
}

impl Identity {
    pub fn user(user_id: u64, ip: impl Into<String>) -> Self {
        Self { user_id: Some(user_id), ip: ip.into() }
    }

    pub fn anonymous(ip: impl Into<String>) -> Self {
        Self { user_id: None, ip: ip.into() }
    }

    /// `user:{id}` for authenticated callers, `ip:{ip}` otherwise.
    ///
    /// Anonymous callers behind the same address share one counter.
    pub fn default_key(&self) -> String {
        match self.user_id {
            Some(id) => format!("user:{id}"),
            None => format!("ip:{}", self.ip),
        }
    }
}

/// Custom identity-to-key mapping; takes precedence over [`Identity::default_key`].
pub type KeyGenerator = Arc<dyn Fn(&Identity) -> String + Send + Sync>;

/// A request admitted by a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    /// Configured maximum per window.
    pub limit: u64,
    /// Requests still admitted in the current window.
    /// Useful for `X-RateLimit-Remaining` headers.
    pub remaining: u64,
    /// Epoch millisecond at which the current window ends.
    pub reset_at: u64,
}

/// A caller exceeded its window quota.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rate limit exceeded for '{key}'; retry in {retry_after_secs}s")]
pub struct RateLimitExceeded {
    /// Store key whose quota ran out.
    pub key: String,
    /// Whole seconds until the window resets, rounded up.
    pub retry_after_secs: u64,
}

impl RateLimitExceeded {
    /// Retry delay as a `Duration`. Useful for `Retry-After` headers.
    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_after_secs)
    }
}

/// Core interface for rate limiting logic.
///
/// Checks are synchronous: they never suspend, so a handler can call them
/// before doing any I/O.
pub trait RateLimiter: Send + Sync {
    /// Count one request for `identity` and decide whether it may proceed.
    fn check(&self, identity: &Identity) -> Result<Allowance, RateLimitExceeded>;
}

impl<L: RateLimiter + ?Sized> RateLimiter for Arc<L> {
    fn check(&self, identity: &Identity) -> Result<Allowance, RateLimitExceeded> {
        (**self).check(identity)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_id {
            Some(id) => write!(f, "user {id} ({})", self.ip),
            None => write!(f, "anonymous ({})", self.ip),
        }
    }
}
