//! Task completion through the engine: XP, levels, streaks and badges

mod common;

use chrono::Duration;

use common::{TestEnv, at};

#[tokio::test]
async fn test_first_completion_awards_points() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 10);

    let result = env.engine.complete_task(task).await.unwrap();

    assert!(!result.already_completed);
    assert!(result.task.done);
    assert!(result.task.completed_at.is_some());
    assert_eq!(result.xp_gained, 10);
    assert_eq!(result.new_xp, 10);
    assert_eq!(result.new_level, 1);
    assert!(!result.leveled_up);
    assert_eq!(result.streak, 1);
    assert_eq!(result.longest_streak, 1);
    assert!(!result.streak_broken);
    assert_eq!(result.newly_unlocked_badges, ["First-task"]);
}

#[tokio::test]
async fn test_second_completion_is_noop() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 10);

    let first = env.engine.complete_task(task).await.unwrap();
    let second = env.engine.complete_task(task).await.unwrap();

    assert!(second.already_completed);
    assert_eq!(second.xp_gained, 0);
    assert_eq!(second.new_xp, first.new_xp);
    assert_eq!(second.new_level, first.new_level);
    assert_eq!(second.streak, first.streak);
    assert_eq!(second.longest_streak, first.longest_streak);
    assert!(!second.leveled_up);
    assert!(second.newly_unlocked_badges.is_empty());
    assert_eq!(second.task.completed_at, first.task.completed_at);

    assert_eq!(env.count("SELECT xp FROM users"), 10);
    assert_eq!(env.count("SELECT COUNT(*) FROM user_badges"), 1);
}

#[tokio::test]
async fn test_level_up_at_hundred_xp() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 100);

    let result = env.engine.complete_task(task).await.unwrap();

    assert_eq!(result.new_xp, 100);
    assert_eq!(result.new_level, 2);
    assert!(result.leveled_up);
    assert_eq!(result.newly_unlocked_badges, ["First-task", "Task-master"]);
    assert_eq!(
        env.count(&format!("SELECT level FROM users WHERE id = {user}")),
        2
    );
}

#[tokio::test]
async fn test_level_five_unlocks_level_badge() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    env.set_user_stats(user, 390, 0, 0, None);
    let task = env.insert_task(user, 10);

    let result = env.engine.complete_task(task).await.unwrap();

    assert_eq!(result.new_xp, 400);
    assert_eq!(result.new_level, 5);
    assert!(result.leveled_up);
    assert!(result.newly_unlocked_badges.contains(&"Level-up".to_string()));
    assert!(result.newly_unlocked_badges.contains(&"Task-master".to_string()));
}

#[tokio::test]
async fn test_streak_grows_on_consecutive_days() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let t1 = env.insert_task(user, 10);
    let t2 = env.insert_task(user, 10);
    let t3 = env.insert_task(user, 10);

    let day1 = env.engine.complete_task(t1).await.unwrap();
    assert_eq!(day1.streak, 1);

    env.clock.advance(Duration::days(1));
    let day2 = env.engine.complete_task(t2).await.unwrap();
    assert_eq!(day2.streak, 2);
    assert_eq!(day2.longest_streak, 2);
    assert!(!day2.streak_broken);

    // Skip two days
    env.clock.advance(Duration::days(3));
    let day5 = env.engine.complete_task(t3).await.unwrap();
    assert_eq!(day5.streak, 1);
    assert_eq!(day5.longest_streak, 2);
    assert!(day5.streak_broken);
}

#[tokio::test]
async fn test_same_day_completions_keep_streak() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let t1 = env.insert_task(user, 10);
    let t2 = env.insert_task(user, 10);

    env.engine.complete_task(t1).await.unwrap();
    env.clock.advance(Duration::hours(5));
    let second = env.engine.complete_task(t2).await.unwrap();

    assert_eq!(second.streak, 1);
    assert!(!second.streak_broken);
    assert_eq!(second.new_xp, 20);
    assert!(second.newly_unlocked_badges.is_empty());
}

#[tokio::test]
async fn test_seventh_day_unlocks_streak_badge() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    env.set_user_stats(user, 0, 6, 6, Some("2025-11-17T09:00:00+00:00"));
    let task = env.insert_task(user, 10);

    let result = env.engine.complete_task(task).await.unwrap();

    assert_eq!(result.streak, 7);
    assert_eq!(result.longest_streak, 7);
    assert_eq!(
        result.newly_unlocked_badges,
        ["First-task", "Streak-champion"]
    );
}

#[tokio::test]
async fn test_early_completion_unlocks_early_bird() {
    let env = TestEnv::starting_at("2025-11-18T07:30:00+00:00").await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 5);

    let result = env.engine.complete_task(task).await.unwrap();

    // 5 XP is below the first badge threshold
    assert_eq!(result.newly_unlocked_badges, ["Early-bird"]);
}

#[tokio::test]
async fn test_days_follow_clock_offset() {
    // 23:30 UTC on the 17th is already the 18th at UTC+2
    let env = TestEnv::starting_at("2025-11-19T09:00:00+02:00").await;
    let user = env.insert_user("alice");
    env.set_user_stats(user, 50, 3, 3, Some("2025-11-17T23:30:00+00:00"));
    let task = env.insert_task(user, 10);

    let result = env.engine.complete_task(task).await.unwrap();

    assert_eq!(result.streak, 4);
    assert!(!result.streak_broken);
}

#[tokio::test]
async fn test_last_activity_is_recorded() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 10);

    env.engine.complete_task(task).await.unwrap();

    let report = env.engine.progress(user).await.unwrap();
    assert_eq!(
        report.last_activity_at.map(|t| t.timestamp_millis()),
        Some(at(common::START).timestamp_millis())
    );
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let env = TestEnv::new().await;

    let err = env.engine.complete_task(404).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Task 404 not found");
}
