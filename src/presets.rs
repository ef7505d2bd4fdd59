//! Production rate limit presets.
//!
//! One limiter per class of write-sensitive operation, all sharing a single
//! process-wide [`InMemoryWindowStore`] and clock.
//!
//! ## Quick Start
//!
//! ```rust
//! use gamekeeper::presets::{Preset, RateLimiters};
//! use gamekeeper::rate_limit::{Identity, RateLimiter};
//!
//! let limiters = RateLimiters::new();
//! let caller = Identity::user(42, "203.0.113.7");
//! assert!(limiters.get(Preset::CommentCreate).check(&caller).is_ok());
//! ```
//!
//! ## Available Presets
//!
//! - [`api`]: generic API calls, 60 per minute
//! - [`prompt_create`]: prompt submissions, 10 per hour
//! - [`comment_create`]: comments, 20 per minute
//! - [`like_bookmark`]: likes and bookmarks, 100 per minute
//! - [`search`]: searches, 30 per minute
//!
//! Presets never share counters: `prompt_create` and `comment_create` use
//! literal key prefixes, the others are namespaced.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::rate_limit::{
    FixedWindowLimiter, Identity, InMemoryWindowStore, RateLimitConfig, Sweeper, SweeperConfig,
    WindowStore,
};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);

const DEFAULT_MAX_REQUESTS_API: u64 = 60;
const DEFAULT_MAX_REQUESTS_PROMPT_CREATE: u64 = 10;
const DEFAULT_MAX_REQUESTS_COMMENT_CREATE: u64 = 20;
const DEFAULT_MAX_REQUESTS_LIKE_BOOKMARK: u64 = 100;
const DEFAULT_MAX_REQUESTS_SEARCH: u64 = 30;

/// Key segment used for callers without a user id.
const ANONYMOUS: &str = "anonymous";

/// Named operation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Api,
    PromptCreate,
    CommentCreate,
    LikeBookmark,
    Search,
}

impl Preset {
    pub const ALL: [Preset; 5] =
        [Preset::Api, Preset::PromptCreate, Preset::CommentCreate, Preset::LikeBookmark, Preset::Search];

    pub const fn name(self) -> &'static str {
        match self {
            Preset::Api => "api",
            Preset::PromptCreate => "prompt_create",
            Preset::CommentCreate => "comment_create",
            Preset::LikeBookmark => "like_bookmark",
            Preset::Search => "search",
        }
    }

    /// Default window and budget.
    pub fn config(self) -> RateLimitConfig {
        let (window, max) = match self {
            Preset::Api => (MINUTE, DEFAULT_MAX_REQUESTS_API),
            Preset::PromptCreate => (HOUR, DEFAULT_MAX_REQUESTS_PROMPT_CREATE),
            Preset::CommentCreate => (MINUTE, DEFAULT_MAX_REQUESTS_COMMENT_CREATE),
            Preset::LikeBookmark => (MINUTE, DEFAULT_MAX_REQUESTS_LIKE_BOOKMARK),
            Preset::Search => (MINUTE, DEFAULT_MAX_REQUESTS_SEARCH),
        };
        RateLimitConfig::new(window, max).expect("preset constants are non-zero")
    }
}

fn user_segment(identity: &Identity) -> String {
    identity.user_id.map_or_else(|| ANONYMOUS.to_string(), |id| id.to_string())
}

fn base(preset: Preset, store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    FixedWindowLimiter::new(preset.config()).named(preset.name()).with_store(store).with_clock(clock)
}

/// Generic API calls: 60 per minute, keyed `api:user:{id}` / `api:ip:{ip}`.
pub fn api(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    base(Preset::Api, store, clock).with_namespace("api")
}

/// Prompt submissions: 10 per hour, keyed `prompt:create:{user}`.
pub fn prompt_create(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    base(Preset::PromptCreate, store, clock)
        .with_key_generator(|id: &Identity| format!("prompt:create:{}", user_segment(id)))
}

/// Comments: 20 per minute, keyed `comment:create:{user}`.
pub fn comment_create(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    base(Preset::CommentCreate, store, clock)
        .with_key_generator(|id: &Identity| format!("comment:create:{}", user_segment(id)))
}

/// Likes and bookmarks: 100 per minute, keyed `like:user:{id}` / `like:ip:{ip}`.
pub fn like_bookmark(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    base(Preset::LikeBookmark, store, clock).with_namespace("like")
}

/// Searches: 30 per minute, keyed `search:user:{id}` / `search:ip:{ip}`.
pub fn search(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
    base(Preset::Search, store, clock).with_namespace("search")
}

/// All presets over one shared store.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    store: Arc<dyn WindowStore>,
    clock: Arc<dyn Clock>,
    api: FixedWindowLimiter,
    prompt_create: FixedWindowLimiter,
    comment_create: FixedWindowLimiter,
    like_bookmark: FixedWindowLimiter,
    search: FixedWindowLimiter,
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiters {
    /// Presets over a fresh in-memory store and the system clock.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(InMemoryWindowStore::new()), Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(Arc::new(InMemoryWindowStore::new()), clock)
    }

    pub fn with_parts(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api: api(store.clone(), clock.clone()),
            prompt_create: prompt_create(store.clone(), clock.clone()),
            comment_create: comment_create(store.clone(), clock.clone()),
            like_bookmark: like_bookmark(store.clone(), clock.clone()),
            search: search(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    pub fn get(&self, preset: Preset) -> &FixedWindowLimiter {
        match preset {
            Preset::Api => &self.api,
            Preset::PromptCreate => &self.prompt_create,
            Preset::CommentCreate => &self.comment_create,
            Preset::LikeBookmark => &self.like_bookmark,
            Preset::Search => &self.search,
        }
    }

    pub fn store(&self) -> Arc<dyn WindowStore> {
        self.store.clone()
    }

    /// Start the background sweep over the shared store.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn start_sweeper(&self, config: SweeperConfig) -> Sweeper {
        Sweeper::start(self.store.clone(), self.clock.clone(), config)
    }
}
