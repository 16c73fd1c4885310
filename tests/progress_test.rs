//! Progress report, leaderboard and badge catalog

mod common;

use common::TestEnv;

#[tokio::test]
async fn test_progress_report() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");
    let task = env.insert_task(user, 120);
    env.engine.complete_task(task).await.unwrap();

    let report = env.engine.progress(user).await.unwrap();

    assert_eq!(report.username, "alice");
    assert_eq!(report.xp, 120);
    assert_eq!(report.level, 2);
    assert_eq!(report.xp_into_level, 20);
    assert_eq!(report.xp_to_next_level, 80);
    assert_eq!(report.streak, 1);

    let names: Vec<_> = report.badges.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["First-task", "Task-master"]);
    assert_eq!(report.badges[0].icon, "🎯");
}

#[tokio::test]
async fn test_progress_serializes_camel_case() {
    let env = TestEnv::new().await;
    let user = env.insert_user("alice");

    let report = env.engine.progress(user).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["xpToNextLevel"], 100);
    assert_eq!(json["longestStreak"], 0);
    assert!(json["lastActivityAt"].is_null());
    assert!(json["badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress_unknown_user() {
    let env = TestEnv::new().await;

    let err = env.engine.progress(12).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_leaderboard_ranks_by_xp() {
    let env = TestEnv::new().await;
    let alice = env.insert_user("alice");
    let bob = env.insert_user("bob");
    let carol = env.insert_user("carol");
    env.set_user_stats(alice, 150, 0, 0, None);
    env.set_user_stats(bob, 420, 0, 0, None);
    env.set_user_stats(carol, 150, 0, 0, None);

    let board = env.engine.leaderboard(10).await.unwrap();

    let order: Vec<_> = board.iter().map(|e| (e.rank, e.username.as_str())).collect();
    assert_eq!(order, [(1u32, "bob"), (2, "alice"), (3, "carol")]);
    assert_eq!(board[0].level, 5);

    let top = env.engine.leaderboard(1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].user_id, bob);
}

#[tokio::test]
async fn test_badge_catalog_loaded() {
    let env = TestEnv::new().await;

    let names: Vec<_> = env
        .engine
        .badge_catalog()
        .iter()
        .map(|b| b.name.as_str())
        .collect();

    assert_eq!(
        names,
        [
            "First-task",
            "Task-master",
            "Streak-champion",
            "Level-up",
            "Early-bird"
        ]
    );
}
