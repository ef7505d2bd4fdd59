//! Progression primitives: XP, levels and daily streaks.
//!
//! - [`levels`]: the XP threshold table and level/progress math.
//! - [`streak`]: the same-day / consecutive-day / broken streak state machine.
//! - [`stats`]: the per-user [`ProgressionState`] record and the mutations
//!   request handlers apply to it.
//! - [`badges`]: the badge catalog and stat-derived eligibility.
//!
//! Everything in `levels` and `streak` is pure: no clock reads, no I/O, no
//! shared state. Callers own persistence and decide what to write back.

pub mod badges;
pub mod levels;
pub mod stats;
pub mod streak;

pub use badges::{Badge, BadgeCategory, BadgeId, UnknownBadge, BADGES};
pub use levels::{
    calculate_level, xp_progress, xp_threshold_for_next_level, XpProgress, XpThreshold,
    LEVEL_THRESHOLDS, MAX_LEVEL,
};
pub use stats::{LevelChange, ProgressionError, ProgressionState, XpAction};
pub use streak::{update_streak, StreakUpdate};
