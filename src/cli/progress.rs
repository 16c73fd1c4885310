//! Read-only commands: progress, leaderboard, today's challenge, badges

use anyhow::Result;

use taskxp::GamificationEngine;
use taskxp::domain::UserId;

use super::print_json;

pub async fn progress_command(engine: &GamificationEngine, user_id: UserId) -> Result<()> {
    let report = engine.progress(user_id).await?;
    print_json(&report)
}

pub async fn leaderboard_command(engine: &GamificationEngine, limit: u32) -> Result<()> {
    let entries = engine.leaderboard(limit).await?;
    if entries.is_empty() {
        println!("No users yet.");
        return Ok(());
    }
    print_json(&entries)
}

pub async fn today_command(engine: &GamificationEngine) -> Result<()> {
    match engine.today_challenge().await? {
        Some(challenge) => print_json(&challenge),
        None => {
            println!("No challenge today.");
            Ok(())
        }
    }
}

/// List the badge catalog
pub fn badges_command(engine: &GamificationEngine) {
    println!("Badges ({}):\n", engine.badge_catalog().len());
    for badge in engine.badge_catalog() {
        println!("  {} {} - {}", badge.icon, badge.name, badge.description);
    }
}
