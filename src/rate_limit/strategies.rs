use crate::clock::{Clock, SystemClock};
use crate::rate_limit::config::RateLimitConfig;
use crate::rate_limit::store::{InMemoryWindowStore, WindowEntry, WindowStore};
use crate::rate_limit::{Allowance, Identity, KeyGenerator, RateLimitExceeded, RateLimiter};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// A fixed-window rate limiter.
///
/// Each key gets `max_requests` per `window`. The first request after a window
/// ends opens a fresh one; requests over the budget are rejected but still
/// counted until the window resets.
///
/// Clones share the store, the clock and the live configuration.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    name: Arc<str>,
    store: Arc<dyn WindowStore>,
    clock: Arc<dyn Clock>,
    config: Arc<ArcSwap<RateLimitConfig>>,
    key_generator: Option<KeyGenerator>,
    namespace: Option<Arc<str>>,
}

impl FixedWindowLimiter {
    /// Create a limiter with its own in-memory store and the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            name: Arc::from("rate_limit"),
            store: Arc::new(InMemoryWindowStore::new()),
            clock: Arc::new(SystemClock),
            config: Arc::new(ArcSwap::from_pointee(config)),
            key_generator: None,
            namespace: None,
        }
    }

    /// Name used in log records.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Back the limiter with a (possibly shared) store.
    pub fn with_store(mut self, store: Arc<dyn WindowStore>) -> Self {
        self.store = store;
        self
    }

    /// Override the clock (useful for deterministic tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Derive keys with `f` instead of [`Identity::default_key`].
    pub fn with_key_generator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Identity) -> String + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(f));
        self
    }

    /// Prefix every key with `{namespace}:` so limiters sharing a store keep
    /// separate counters.
    pub fn with_namespace(mut self, namespace: impl Into<Arc<str>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> RateLimitConfig {
        **self.config.load()
    }

    /// Swap the configuration for all clones of this limiter.
    ///
    /// Open windows keep their `reset_at`; the new budget applies to the next check.
    pub fn reconfigure(&self, config: RateLimitConfig) {
        tracing::info!(
            target: "gamekeeper::rate_limit",
            limiter = %self.name,
            window_ms = config.window_ms(),
            max_requests = config.max_requests(),
            "rate limit reconfigured"
        );
        self.config.store(Arc::new(config));
    }

    /// Store key for `identity`.
    pub fn key_for(&self, identity: &Identity) -> String {
        let base = match &self.key_generator {
            Some(generate) => generate(identity),
            None => identity.default_key(),
        };
        match &self.namespace {
            Some(ns) => format!("{ns}:{base}"),
            None => base,
        }
    }

    /// Count one request against an already-derived key.
    pub fn check_key(&self, key: &str) -> Result<Allowance, RateLimitExceeded> {
        let now = self.clock.now_millis();
        let config = self.config();
        let window_ms = config.window_ms();
        let limit = config.max_requests();

        let mut opened = false;
        let entry = self.store.update(key, &mut |current: Option<WindowEntry>| match current {
            Some(entry) if !entry.is_expired(now) => {
                WindowEntry { count: entry.count.saturating_add(1), ..entry }
            }
            _ => {
                opened = true;
                WindowEntry::open(now, window_ms)
            }
        });

        if opened {
            tracing::debug!(
                target: "gamekeeper::rate_limit",
                limiter = %self.name,
                key,
                reset_at = entry.reset_at,
                "rate limit window opened"
            );
        }

        if entry.count > limit {
            let remaining_ms = entry.reset_at.saturating_sub(now);
            let retry_after_secs = remaining_ms / 1000 + u64::from(remaining_ms % 1000 != 0);
            if entry.count == limit + 1 {
                tracing::warn!(
                    target: "gamekeeper::rate_limit",
                    limiter = %self.name,
                    key,
                    limit,
                    retry_after_secs,
                    "rate limit exceeded"
                );
            } else {
                tracing::debug!(
                    target: "gamekeeper::rate_limit",
                    limiter = %self.name,
                    key,
                    count = entry.count,
                    "rate limited request rejected"
                );
            }
            return Err(RateLimitExceeded { key: key.to_string(), retry_after_secs });
        }

        Ok(Allowance { limit, remaining: limit - entry.count, reset_at: entry.reset_at })
    }

    /// Forget the window for `identity`, restoring its full budget.
    pub fn reset(&self, identity: &Identity) {
        let key = self.key_for(identity);
        self.store.delete(&key);
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, identity: &Identity) -> Result<Allowance, RateLimitExceeded> {
        self.check_key(&self.key_for(identity))
    }
}

impl fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("name", &self.name)
            .field("config", &self.config())
            .field("namespace", &self.namespace)
            .field("custom_keys", &self.key_generator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn limiter(clock: &ManualClock, window_ms: u64, max: u64) -> FixedWindowLimiter {
        let config = RateLimitConfig::new(Duration::from_millis(window_ms), max).unwrap();
        FixedWindowLimiter::new(config).with_clock(Arc::new(clock.clone()))
    }

    #[test]
    fn allows_up_to_max_then_rejects() {
        let clock = ManualClock::new(1_000_000);
        let limiter = limiter(&clock, 60_000, 3);
        let who = Identity::user(1, "10.0.0.1");

        for expected_remaining in [2, 1, 0] {
            let allowance = limiter.check(&who).expect("within budget");
            assert_eq!(allowance.remaining, expected_remaining);
            assert_eq!(allowance.limit, 3);
        }

        clock.advance(10_500);
        let err = limiter.check(&who).expect_err("fourth call is over budget");
        assert_eq!(err.key, "user:1");
        // 49.5s left rounds up.
        assert_eq!(err.retry_after_secs, 50);
    }

    #[test]
    fn rejected_calls_keep_counting() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 1_000, 1);
        let store = InMemoryWindowStore::new();
        let limiter = limiter.with_store(Arc::new(store.clone()));

        limiter.check_key("k").unwrap();
        for _ in 0..5 {
            assert!(limiter.check_key("k").is_err());
        }
        assert_eq!(store.get("k").map(|e| e.count), Some(6));
    }

    #[test]
    fn window_expiry_replaces_entry() {
        let clock = ManualClock::new(0);
        let store = InMemoryWindowStore::new();
        let limiter = limiter(&clock, 1_000, 2).with_store(Arc::new(store.clone()));

        limiter.check_key("k").unwrap();
        limiter.check_key("k").unwrap();
        assert!(limiter.check_key("k").is_err());

        // reset_at == now is still inside the window.
        clock.set(1_000);
        assert!(limiter.check_key("k").is_err());

        clock.set(1_001);
        let allowance = limiter.check_key("k").expect("new window");
        assert_eq!(allowance.remaining, 1);
        assert_eq!(store.get("k"), Some(WindowEntry { count: 1, reset_at: 2_001 }));
    }

    #[test]
    fn custom_key_generator_wins() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 1_000, 1)
            .with_key_generator(|id: &Identity| format!("custom:{}", id.ip));
        assert_eq!(limiter.key_for(&Identity::user(9, "1.2.3.4")), "custom:1.2.3.4");
    }

    #[test]
    fn namespace_prefixes_keys() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 1_000, 1).with_namespace("search");
        assert_eq!(limiter.key_for(&Identity::anonymous("1.2.3.4")), "search:ip:1.2.3.4");
    }

    #[test]
    fn reconfigure_is_shared_by_clones() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 1_000, 1);
        let clone = limiter.clone();
        clone.reconfigure(RateLimitConfig::new(Duration::from_secs(1), 5).unwrap());
        assert_eq!(limiter.config().max_requests(), 5);

        let who = Identity::anonymous("x");
        for _ in 0..5 {
            limiter.check(&who).unwrap();
        }
        assert!(limiter.check(&who).is_err());
    }

    #[test]
    fn reset_restores_budget() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 60_000, 1);
        let who = Identity::user(4, "x");
        limiter.check(&who).unwrap();
        assert!(limiter.check(&who).is_err());
        limiter.reset(&who);
        assert!(limiter.check(&who).is_ok());
    }

    #[test]
    fn debug_omits_closure() {
        let clock = ManualClock::new(0);
        let limiter = limiter(&clock, 1_000, 1).named("api");
        let out = format!("{limiter:?}");
        assert!(out.contains("api"));
        assert!(out.contains("custom_keys: false"));
    }
}
