#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # gamekeeper
//!
//! Progression and abuse-guarding primitives for learning platforms: XP,
//! levels, daily streaks, badges, and fixed-window rate limiting.
//!
//! ## Features
//!
//! - **Levels** from a fixed XP threshold table, with per-level progress
//! - **Streaks** as a pure same-day / consecutive-day / broken state machine
//! - **Stats records** that apply XP awards and activities the way handlers persist them
//! - **Fixed-window rate limiting** per caller with pluggable storage
//! - **Presets** for prompt, comment, like, search and generic API traffic
//! - **Tower middleware** that rejects before your service runs
//! - **Injectable clocks** so windows and calendar days are testable
//!
//! ## Quick Start
//!
//! ```rust
//! use gamekeeper::progression::{xp_progress, ProgressionState, XpAction};
//! use gamekeeper::rate_limit::{FixedWindowLimiter, Identity, RateLimitConfig, RateLimiter};
//! use chrono::NaiveDate;
//!
//! let mut stats = ProgressionState::new();
//! stats.award(XpAction::LessonComplete);
//! stats.record_activity(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
//! assert_eq!(stats.current_streak, 1);
//! assert_eq!(xp_progress(stats.total_xp).current_level, 1);
//!
//! let limiter = FixedWindowLimiter::new(RateLimitConfig::per_minute(3).unwrap());
//! let caller = Identity::user(1, "198.51.100.4");
//! for _ in 0..3 {
//!     assert!(limiter.check(&caller).is_ok());
//! }
//! assert!(limiter.check(&caller).is_err());
//! ```

pub mod clock;
pub mod error;
pub mod presets;
pub mod prelude;
pub mod progression;
pub mod rate_limit;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::GateError;
pub use presets::{Preset, RateLimiters};
pub use progression::{
    calculate_level, update_streak, xp_progress, xp_threshold_for_next_level, ProgressionState,
    StreakUpdate, XpProgress, XpThreshold,
};
pub use rate_limit::{
    FixedWindowLimiter, Identity, RateLimitConfig, RateLimitExceeded, RateLimitLayer, RateLimiter,
};
