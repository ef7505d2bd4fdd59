//! Daily streak state machine.

use chrono::NaiveDate;

use super::stats::XpAction;

/// Result of [`update_streak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreakUpdate {
    pub new_streak: u32,
    pub longest_streak: u32,
    /// `false` only when an activity was already recorded today; callers
    /// persist nothing in that case.
    pub updated: bool,
}

impl StreakUpdate {
    /// Bonus action earned when this update lands exactly on a milestone day.
    pub fn milestone(&self) -> Option<XpAction> {
        if !self.updated {
            return None;
        }
        match self.new_streak {
            7 => Some(XpAction::Streak7Days),
            30 => Some(XpAction::Streak30Days),
            _ => None,
        }
    }
}

/// Advance a streak for an activity happening on `today`.
///
/// | last activity       | new streak           | longest streak   | updated |
/// |---------------------|----------------------|------------------|---------|
/// | today               | `current_streak`     | `current_streak` | false   |
/// | yesterday           | `current_streak + 1` | new streak       | true    |
/// | before yesterday    | 1                    | `current_streak` | true    |
/// | none                | 1                    | 1                | true    |
///
/// `longest_streak` here is only the candidate derived from `current_streak`;
/// the stored historical maximum is merged by [`ProgressionState::record_activity`].
///
/// [`ProgressionState::record_activity`]: super::ProgressionState::record_activity
pub fn update_streak(
    current_streak: u32,
    last_activity_date: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    if last_activity_date == Some(today) {
        return StreakUpdate {
            new_streak: current_streak,
            longest_streak: current_streak,
            updated: false,
        };
    }

    let yesterday = today.pred_opt();
    match (last_activity_date, yesterday) {
        (Some(last), Some(yesterday)) if last == yesterday => {
            let new_streak = current_streak.saturating_add(1);
            StreakUpdate { new_streak, longest_streak: new_streak, updated: true }
        }
        (Some(last), Some(yesterday)) if last < yesterday => {
            StreakUpdate { new_streak: 1, longest_streak: current_streak, updated: true }
        }
        // First activity ever, or a last date after today (clock skew).
        _ => StreakUpdate { new_streak: 1, longest_streak: 1, updated: true },
    }
}
