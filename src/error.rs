//! Error type surfaced by the rate limit middleware.
use crate::rate_limit::RateLimitExceeded;
use std::fmt;
use std::time::Duration;
/// Error returned by a service wrapped in [`RateLimitLayer`](crate::rate_limit::RateLimitLayer).
#[derive(Debug, Clone)]
pub enum GateError<E> {
    /// The caller exceeded its window quota; the inner service was not called.
    RateLimited(RateLimitExceeded),
    /// The underlying service failed
    Inner(E),
}
impl<E: fmt::Display> fmt::Display for GateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited(exceeded) => write!(f, "{}", exceeded),
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}
impl<E: std::error::Error + 'static> std::error::Error for GateError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RateLimited(exceeded) => Some(exceeded),
            Self::Inner(e) => Some(e),
        }
    }
}
impl<E> From<RateLimitExceeded> for GateError<E> {
    fn from(exceeded: RateLimitExceeded) -> Self {
        Self::RateLimited(exceeded)
    }
}
impl<E> GateError<E> {
    /// Check if this error is a rate limit rejection
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
    /// Check if this error wraps an inner error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }
    /// How long the caller should wait, for rate limit rejections.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(exceeded) => Some(exceeded.retry_after()),
            Self::Inner(_) => None,
        }
    }
    /// Get the inner error if this is an Inner variant
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            Self::RateLimited(_) => None,
        }
    }
    /// Borrow the inner error if present.
    pub fn as_inner(&self) -> Option<&E> {
        match self {
            Self::Inner(e) => Some(e),
            Self::RateLimited(_) => None,
        }
    }
    /// Borrow the rejection details if present.
    pub fn as_rate_limited(&self) -> Option<&RateLimitExceeded> {
        match self {
            Self::RateLimited(exceeded) => Some(exceeded),
            Self::Inner(_) => None,
        }
    }
}
