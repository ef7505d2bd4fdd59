//! Level thresholds and XP progress.

/// Ascending `(floor, level)` pairs. A user is at the highest level whose
/// floor is `<=` their total XP.
pub const LEVEL_THRESHOLDS: &[(u64, u32)] = &[(0, 1), (100, 2), (300, 3), (600, 4), (1000, 5)];

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 5;

/// XP needed to leave a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind", content = "xp"))]
pub enum XpThreshold {
    /// The level ends once total XP reaches this value.
    At(u64),
    /// No ceiling: the max level, or a level outside the table.
    Unbounded,
}

impl XpThreshold {
    /// The finite threshold, if any.
    pub fn xp(self) -> Option<u64> {
        match self {
            XpThreshold::At(xp) => Some(xp),
            XpThreshold::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, XpThreshold::Unbounded)
    }
}

/// Level for the given cumulative XP.
///
/// ```
/// use gamekeeper::progression::calculate_level;
/// assert_eq!(calculate_level(99), 1);
/// assert_eq!(calculate_level(100), 2);
/// assert_eq!(calculate_level(50_000), 5);
/// ```
pub fn calculate_level(total_xp: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .rev()
        .find(|(floor, _)| total_xp >= *floor)
        .map(|(_, level)| *level)
        .unwrap_or(1)
}

/// XP value at which `level` transitions to `level + 1`.
///
/// Level 5 and any level outside the table return [`XpThreshold::Unbounded`].
pub fn xp_threshold_for_next_level(level: u32) -> XpThreshold {
    if level == 0 {
        return XpThreshold::Unbounded;
    }
    let Some(next) = level.checked_add(1) else {
        return XpThreshold::Unbounded;
    };
    LEVEL_THRESHOLDS
        .iter()
        .find(|(_, l)| *l == next)
        .map(|(floor, _)| XpThreshold::At(*floor))
        .unwrap_or(XpThreshold::Unbounded)
}

/// Snapshot of how far a user is into their current level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpProgress {
    pub current_level: u32,
    /// XP earned since entering `current_level`.
    pub current_level_xp: u64,
    pub next_level_xp: XpThreshold,
    /// Fraction of the level completed, always within `[0.0, 1.0]`.
    /// The max level reports `1.0`.
    pub progress: f64,
}

/// Progress toward the next level for the given cumulative XP.
pub fn xp_progress(total_xp: u64) -> XpProgress {
    let current_level = calculate_level(total_xp);
    let next_level_xp = xp_threshold_for_next_level(current_level);
    let previous_threshold = if current_level == 1 {
        0
    } else {
        xp_threshold_for_next_level(current_level - 1).xp().unwrap_or(0)
    };
    let current_level_xp = total_xp.saturating_sub(previous_threshold);

    let progress = match next_level_xp {
        XpThreshold::Unbounded => 1.0,
        XpThreshold::At(next) => {
            let level_range = next.saturating_sub(previous_threshold);
            if level_range == 0 {
                1.0
            } else {
                current_level_xp as f64 / level_range as f64
            }
        }
    };

    XpProgress { current_level, current_level_xp, next_level_xp, progress: progress.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_threshold_table() {
        for xp in 0..100 {
            assert_eq!(calculate_level(xp), 1, "xp {xp}");
        }
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(299), 2);
        assert_eq!(calculate_level(300), 3);
        assert_eq!(calculate_level(599), 3);
        assert_eq!(calculate_level(600), 4);
        assert_eq!(calculate_level(999), 4);
        assert_eq!(calculate_level(1000), 5);
        assert_eq!(calculate_level(u64::MAX), 5);
    }

    #[test]
    fn table_is_strictly_ascending() {
        for pair in LEVEL_THRESHOLDS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert_eq!(pair[0].1 + 1, pair[1].1);
        }
        assert_eq!(LEVEL_THRESHOLDS.last().map(|(_, l)| *l), Some(MAX_LEVEL));
    }

    #[test]
    fn next_level_thresholds() {
        assert_eq!(xp_threshold_for_next_level(1), XpThreshold::At(100));
        assert_eq!(xp_threshold_for_next_level(2), XpThreshold::At(300));
        assert_eq!(xp_threshold_for_next_level(3), XpThreshold::At(600));
        assert_eq!(xp_threshold_for_next_level(4), XpThreshold::At(1000));
        assert_eq!(xp_threshold_for_next_level(5), XpThreshold::Unbounded);
    }

    #[test]
    fn out_of_range_levels_are_unbounded() {
        assert!(xp_threshold_for_next_level(0).is_unbounded());
        assert!(xp_threshold_for_next_level(6).is_unbounded());
        assert!(xp_threshold_for_next_level(u32::MAX).is_unbounded());
    }

    #[test]
    fn progress_midway_through_level_two() {
        let p = xp_progress(200);
        assert_eq!(p.current_level, 2);
        assert_eq!(p.current_level_xp, 100);
        assert_eq!(p.next_level_xp, XpThreshold::At(300));
        assert!((p.progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_threshold_resets_level_local_xp() {
        let p = xp_progress(300);
        assert_eq!(p.current_level, 3);
        assert_eq!(p.current_level_xp, 0);
        assert_eq!(p.progress, 0.0);
    }

    #[test]
    fn max_level_saturates() {
        let p = xp_progress(1000);
        assert_eq!(p.current_level, 5);
        assert_eq!(p.progress, 1.0);
        assert!(p.next_level_xp.is_unbounded());
        assert_eq!(xp_progress(123_456).progress, 1.0);
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        for xp in (0..2_000).chain([u64::MAX - 1, u64::MAX]) {
            let p = xp_progress(xp).progress;
            assert!((0.0..=1.0).contains(&p), "xp {xp} gave {p}");
        }
    }

    #[test]
    fn pure_functions_are_repeatable() {
        for xp in [0, 99, 100, 450, 999, 1000, 5000] {
            assert_eq!(calculate_level(xp), calculate_level(xp));
            assert_eq!(xp_progress(xp), xp_progress(xp));
        }
    }
}
