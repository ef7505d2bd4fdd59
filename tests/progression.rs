use chrono::NaiveDate;
use gamekeeper::clock::{Clock, ManualClock};
use gamekeeper::progression::{
    calculate_level, update_streak, xp_progress, ProgressionState, StreakUpdate, XpAction,
    XpThreshold,
};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
}

#[test]
fn level_boundaries() {
    assert!((0..100).all(|xp| calculate_level(xp) == 1));
    assert_eq!(calculate_level(99), 1);
    assert_eq!(calculate_level(100), 2);
}

#[test]
fn progress_is_always_a_fraction() {
    for xp in (0..3_000).step_by(7) {
        let p = xp_progress(xp);
        assert!((0.0..=1.0).contains(&p.progress), "xp {xp}");
        assert_eq!(p.current_level, calculate_level(xp));
    }
}

#[test]
fn max_level_is_fully_progressed() {
    let p = xp_progress(1000);
    assert_eq!(p.progress, 1.0);
    assert_eq!(p.current_level, 5);
    assert_eq!(p.next_level_xp, XpThreshold::Unbounded);
}

#[test]
fn level_threshold_zeroes_level_xp() {
    assert_eq!(xp_progress(300).current_level_xp, 0);
    assert_eq!(xp_progress(600).current_level_xp, 0);
}

#[test]
fn streak_transitions() {
    let today = today();
    let yesterday = today.pred_opt().unwrap();
    let three_days_ago = today - chrono::Duration::days(3);

    let same_day = update_streak(5, Some(today), today);
    assert_eq!(same_day.new_streak, 5);
    assert!(!same_day.updated);

    let continued = update_streak(5, Some(yesterday), today);
    assert_eq!(continued.new_streak, 6);
    assert!(continued.updated);

    let broken = update_streak(5, Some(three_days_ago), today);
    assert_eq!(broken.new_streak, 1);
    assert!(broken.updated);

    assert_eq!(
        update_streak(0, None, today),
        StreakUpdate { new_streak: 1, longest_streak: 1, updated: true }
    );
}

#[test]
fn pure_functions_are_idempotent() {
    for xp in [0, 150, 300, 999, 1000, 10_000] {
        assert_eq!(calculate_level(xp), calculate_level(xp));
        assert_eq!(xp_progress(xp), xp_progress(xp));
    }
}

#[test]
fn month_of_daily_study_with_a_clock() {
    let clock = ManualClock::at_date(today());
    let mut stats = ProgressionState::new();
    let mut milestones = Vec::new();

    for _ in 0..30 {
        // Mid-day activity; the date comparison ignores the time of day.
        clock.advance(DAY_MS / 2);
        stats.award(XpAction::LessonComplete);
        let update = stats.record_activity_with(&clock);
        if let Some(bonus) = update.milestone() {
            stats.award(bonus);
            milestones.push(bonus);
        }
        clock.advance(DAY_MS / 2);
    }

    assert_eq!(milestones, vec![XpAction::Streak7Days, XpAction::Streak30Days]);
    assert_eq!(stats.current_streak, 30);
    assert_eq!(stats.longest_streak, 30);
    assert_eq!(stats.total_xp, 30 * 10 + 20 + 50);
    assert_eq!(stats.current_level, calculate_level(stats.total_xp));
    assert_eq!(stats.last_activity_date, Some(clock.today().pred_opt().unwrap()));
}

#[test]
fn award_validation_and_level_up() {
    let mut stats = ProgressionState::new();
    assert!(stats.award_xp(0).is_err());
    assert!(stats.award_xp(101).is_err());
    let change = stats.award_xp(100).unwrap();
    assert!(change.leveled_up());
    assert_eq!(stats.current_level, 2);
}

#[test]
fn historical_longest_survives_a_reset() {
    let mut stats = ProgressionState::new();
    let start = today();
    for offset in 0..12 {
        stats.record_activity(start + chrono::Duration::days(offset));
    }
    stats.record_activity(start + chrono::Duration::days(20));
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 12);
}

#[cfg(feature = "serde")]
#[test]
fn stats_serialize_with_platform_field_names() {
    let mut stats = ProgressionState::new();
    stats.award(XpAction::QuizCorrect);
    stats.record_activity(today());

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalXP"], 5);
    assert_eq!(json["currentLevel"], 1);
    assert_eq!(json["lastActivityDate"], "2025-02-14");

    let back: ProgressionState = serde_json::from_value(json).unwrap();
    assert_eq!(back, stats);
}
