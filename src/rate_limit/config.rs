//! Validated limiter configuration.

use std::time::Duration;

/// Errors produced when validating rate limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitConfigError {
    /// Window must be at least one millisecond.
    #[error("window must be > 0 (got {0:?})")]
    InvalidWindow(Duration),
    /// At least one request per window must be allowed.
    #[error("max_requests must be > 0 (got {provided})")]
    InvalidMaxRequests {
        /// Value provided by caller.
        provided: u64,
    },
    /// Sweep interval must be > 0.
    #[error("sweep interval must be > 0 (got {0:?})")]
    InvalidSweepInterval(Duration),
}

/// Window length and request budget for one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawConfig", into = "RawConfig"))]
pub struct RateLimitConfig {
    window: Duration,
    max_requests: u64,
}

impl RateLimitConfig {
    /// Create a config with validation.
    ///
    /// # Examples
    /// ```
    /// use gamekeeper::rate_limit::RateLimitConfig;
    /// use std::time::Duration;
    /// let cfg = RateLimitConfig::new(Duration::from_secs(60), 20).unwrap();
    /// assert_eq!(cfg.window_ms(), 60_000);
    /// assert!(RateLimitConfig::new(Duration::ZERO, 20).is_err());
    /// ```
    pub fn new(window: Duration, max_requests: u64) -> Result<Self, RateLimitConfigError> {
        if window.as_millis() == 0 {
            return Err(RateLimitConfigError::InvalidWindow(window));
        }
        if max_requests == 0 {
            return Err(RateLimitConfigError::InvalidMaxRequests { provided: max_requests });
        }
        Ok(Self { window, max_requests })
    }

    pub fn per_minute(max_requests: u64) -> Result<Self, RateLimitConfigError> {
        Self::new(Duration::from_secs(60), max_requests)
    }

    pub fn per_hour(max_requests: u64) -> Result<Self, RateLimitConfigError> {
        Self::new(Duration::from_secs(60 * 60), max_requests)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_ms(&self) -> u64 {
        u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }
}

/// Wire form: `{ "window_ms": 60000, "max_requests": 20 }`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawConfig {
    window_ms: u64,
    max_requests: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConfig> for RateLimitConfig {
    type Error = RateLimitConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(Duration::from_millis(raw.window_ms), raw.max_requests)
    }
}

#[cfg(feature = "serde")]
impl From<RateLimitConfig> for RawConfig {
    fn from(cfg: RateLimitConfig) -> Self {
        RawConfig { window_ms: cfg.window_ms(), max_requests: cfg.max_requests }
    }
}
