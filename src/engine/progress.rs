//! Read-only views: progress report and leaderboard

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{BadgeUnlock, User, UserId};
use crate::gamification::{BadgeCatalog, LevelProgress};

/// A badge a user holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_at: DateTime<Utc>,
}

/// Snapshot of a user's progression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub user_id: UserId,
    pub username: String,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    pub longest_streak: u32,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    pub badges: Vec<EarnedBadge>,
}

impl ProgressReport {
    /// Level numbers come from XP, so a lagging stored level is not shown
    pub(super) fn new(user: User, badges: Vec<EarnedBadge>) -> Self {
        let progress = LevelProgress::for_xp(user.xp);
        Self {
            user_id: user.id,
            username: user.username,
            xp: user.xp,
            level: progress.level,
            streak: user.streak,
            longest_streak: user.longest_streak,
            last_activity_at: user.last_activity_at,
            xp_into_level: progress.xp_into_level,
            xp_to_next_level: progress.xp_to_next_level,
            badges,
        }
    }
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub xp: u64,
    pub level: u32,
}

/// Rank users already sorted by XP, starting at 1
pub(super) fn rank(users: Vec<User>) -> Vec<LeaderboardEntry> {
    users
        .into_iter()
        .zip(1..)
        .map(|(user, rank)| LeaderboardEntry {
            rank,
            user_id: user.id,
            username: user.username,
            level: LevelProgress::for_xp(user.xp).level,
            xp: user.xp,
        })
        .collect()
}

/// Join unlock rows with the catalog, skipping ids the catalog lacks
pub(super) fn earned_badges(
    catalog: &BadgeCatalog,
    unlocks: Vec<BadgeUnlock>,
) -> Vec<EarnedBadge> {
    unlocks
        .into_iter()
        .filter_map(|unlock| {
            catalog.get(unlock.badge_id).map(|badge| EarnedBadge {
                name: badge.name.clone(),
                description: badge.description.clone(),
                icon: badge.icon.clone(),
                earned_at: unlock.earned_at,
            })
        })
        .collect()
}
