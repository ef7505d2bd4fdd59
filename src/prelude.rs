//! Convenient re-exports for common gamekeeper types.
pub use crate::{
    clock::{Clock, ManualClock, SystemClock},
    presets::{Preset, RateLimiters},
    progression::{
        calculate_level, update_streak, xp_progress, xp_threshold_for_next_level, BadgeId,
        LevelChange, ProgressionError, ProgressionState, StreakUpdate, XpAction, XpProgress,
        XpThreshold,
    },
    rate_limit::{
        Allowance, FixedWindowLimiter, Identity, IdentityExtractor, InMemoryWindowStore,
        RateLimitConfig, RateLimitExceeded, RateLimitLayer, RateLimiter, Sweeper, SweeperConfig,
        WindowStore,
    },
    GateError,
};
