//! Per-user progression record and the mutations applied to it.

use chrono::NaiveDate;

use super::badges::BadgeId;
use super::levels::{calculate_level, xp_progress, XpProgress, MAX_LEVEL};
use super::streak::{update_streak, StreakUpdate};
use crate::clock::Clock;

/// Smallest XP award accepted by [`ProgressionState::award_xp`].
pub const MIN_XP_AWARD: u64 = 1;
/// Largest XP award accepted by [`ProgressionState::award_xp`].
pub const MAX_XP_AWARD: u64 = 100;

/// Lifetime prompt uses needed for [`BadgeId::PromptMaster`].
pub const PROMPT_MASTER_USES: u32 = 100;

/// Activities that earn XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum XpAction {
    LessonComplete,
    QuizCorrect,
    PromptUse,
    DailyGoalComplete,
    Streak7Days,
    Streak30Days,
}

impl XpAction {
    pub const fn xp(self) -> u64 {
        match self {
            XpAction::LessonComplete => 10,
            XpAction::QuizCorrect => 5,
            XpAction::PromptUse => 2,
            XpAction::DailyGoalComplete => 5,
            XpAction::Streak7Days => 20,
            XpAction::Streak30Days => 50,
        }
    }
}

/// Errors from mutating a [`ProgressionState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("xp award must be within 1..=100 (got {provided})")]
    InvalidXpAward { provided: u64 },
}

/// Level before and after an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub previous: u32,
    pub current: u32,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.current > self.previous
    }
}

/// A user's stored progression row.
///
/// `current_level` is always `calculate_level(total_xp)` as long as XP only
/// changes through [`award_xp`](Self::award_xp) or [`award`](Self::award).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProgressionState {
    #[cfg_attr(feature = "serde", serde(rename = "totalXP"))]
    pub total_xp: u64,
    pub current_level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub total_lessons_completed: u32,
    pub total_quizzes_passed: u32,
    pub prompt_uses: u32,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Stats for a user with no recorded activity.
    pub fn new() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            total_lessons_completed: 0,
            total_quizzes_passed: 0,
            prompt_uses: 0,
        }
    }

    /// Add `xp` to the total and recompute the level.
    ///
    /// # Errors
    /// [`ProgressionError::InvalidXpAward`] unless `1 <= xp <= 100`.
    pub fn award_xp(&mut self, xp: u64) -> Result<LevelChange, ProgressionError> {
        if !(MIN_XP_AWARD..=MAX_XP_AWARD).contains(&xp) {
            return Err(ProgressionError::InvalidXpAward { provided: xp });
        }
        Ok(self.apply_xp(xp))
    }

    /// Award the XP for `action` and bump the matching activity counter.
    pub fn award(&mut self, action: XpAction) -> LevelChange {
        match action {
            XpAction::LessonComplete => {
                self.total_lessons_completed = self.total_lessons_completed.saturating_add(1)
            }
            XpAction::QuizCorrect => {
                self.total_quizzes_passed = self.total_quizzes_passed.saturating_add(1)
            }
            XpAction::PromptUse => self.prompt_uses = self.prompt_uses.saturating_add(1),
            XpAction::DailyGoalComplete | XpAction::Streak7Days | XpAction::Streak30Days => {}
        }
        self.apply_xp(action.xp())
    }

    fn apply_xp(&mut self, xp: u64) -> LevelChange {
        let previous = self.current_level;
        self.total_xp = self.total_xp.saturating_add(xp);
        self.current_level = calculate_level(self.total_xp);
        let change = LevelChange { previous, current: self.current_level };
        if change.leveled_up() {
            tracing::debug!(
                target: "gamekeeper::progression",
                from = previous,
                to = change.current,
                total_xp = self.total_xp,
                "level up"
            );
        }
        change
    }

    /// Record a qualifying activity on `today`.
    ///
    /// Writes back only when the streak changed; the stored longest streak
    /// never decreases.
    pub fn record_activity(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = update_streak(self.current_streak, self.last_activity_date, today);
        if update.updated {
            self.current_streak = update.new_streak;
            self.longest_streak = self.longest_streak.max(update.longest_streak);
            self.last_activity_date = Some(today);
            tracing::debug!(
                target: "gamekeeper::progression",
                streak = update.new_streak,
                longest = self.longest_streak,
                "streak updated"
            );
        }
        update
    }

    /// [`record_activity`](Self::record_activity) using `clock.today()`.
    pub fn record_activity_with(&mut self, clock: &dyn Clock) -> StreakUpdate {
        self.record_activity(clock.today())
    }

    pub fn progress(&self) -> XpProgress {
        xp_progress(self.total_xp)
    }

    /// Badges these stats qualify for. Course badges depend on course data and
    /// are never returned here.
    pub fn eligible_badges(&self) -> Vec<BadgeId> {
        let mut earned = Vec::new();
        if self.total_lessons_completed >= 1 {
            earned.push(BadgeId::FirstLesson);
        }
        if self.longest_streak >= 7 {
            earned.push(BadgeId::Streak7);
        }
        if self.longest_streak >= 30 {
            earned.push(BadgeId::Streak30);
        }
        if self.prompt_uses >= PROMPT_MASTER_USES {
            earned.push(BadgeId::PromptMaster);
        }
        if self.current_level >= MAX_LEVEL {
            earned.push(BadgeId::Level5);
        }
        earned
    }
}
