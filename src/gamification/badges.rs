//! Badge rules and unlock evaluation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{Badge, BadgeCondition, UserId};
use crate::error::StoreResult;
use crate::store::{AwardTx, BadgeStore};

/// Snapshot of the user fields badge rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub xp: u64,
    pub streak: u32,
    pub level: u32,
    /// Hour of day (0-23) of the latest activity, in the user's offset
    pub last_activity_hour: Option<u32>,
}

impl BadgeCondition {
    /// Check if the condition holds for the given stats
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match *self {
            Self::XpAtLeast(xp) => stats.xp >= xp,
            Self::StreakAtLeast(days) => stats.streak >= days,
            Self::LevelAtLeast(level) => stats.level >= level,
            Self::ActiveBeforeHour(hour) => stats.last_activity_hour.is_some_and(|h| h < hour),
        }
    }
}

/// Seed definition of a badge
#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: BadgeCondition,
}

/// Rule table seeded into every new database
pub static DEFAULT_BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        slug: "first_task",
        name: "First-task",
        description: "Earn your first 10 XP",
        icon: "🎯",
        condition: BadgeCondition::XpAtLeast(10),
    },
    BadgeDefinition {
        slug: "task_master",
        name: "Task-master",
        description: "Reach 100 XP",
        icon: "⚡",
        condition: BadgeCondition::XpAtLeast(100),
    },
    BadgeDefinition {
        slug: "streak_champion",
        name: "Streak-champion",
        description: "Complete tasks 7 days in a row",
        icon: "🏃",
        condition: BadgeCondition::StreakAtLeast(7),
    },
    BadgeDefinition {
        slug: "level_up",
        name: "Level-up",
        description: "Reach level 5",
        icon: "👑",
        condition: BadgeCondition::LevelAtLeast(5),
    },
    BadgeDefinition {
        slug: "early_bird",
        name: "Early-bird",
        description: "Complete a task before 8am",
        icon: "🌅",
        condition: BadgeCondition::ActiveBeforeHour(8),
    },
];

/// Immutable badge catalog, loaded once
#[derive(Debug, Clone, Default)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<Badge>) -> Self {
        Self { badges }
    }

    /// Read the catalog from the badge store
    pub async fn load(store: &dyn BadgeStore) -> StoreResult<Self> {
        let badges = store.list_all().await?;
        debug!("Loaded {} badge definitions", badges.len());
        Ok(Self::new(badges))
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn get(&self, id: i64) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    /// Badges whose condition holds for `stats`, earned or not
    pub fn satisfied<'a>(&'a self, stats: &'a UserStats) -> impl Iterator<Item = &'a Badge> + 'a {
        self.badges.iter().filter(|b| b.condition.is_met(stats))
    }
}

/// Persists newly satisfied badges for a user
#[derive(Clone)]
pub struct BadgeEvaluator {
    catalog: Arc<BadgeCatalog>,
    store: Arc<dyn BadgeStore>,
}

impl BadgeEvaluator {
    pub fn new(catalog: Arc<BadgeCatalog>, store: Arc<dyn BadgeStore>) -> Self {
        Self { catalog, store }
    }

    /// Unlock every satisfied badge the user does not hold yet
    ///
    /// Returns the names of badges unlocked by this call. Badges that were
    /// already held (including ones a concurrent call just inserted) are
    /// skipped silently.
    pub async fn evaluate(
        &self,
        user_id: UserId,
        stats: &UserStats,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<Vec<String>> {
        let mut newly_unlocked = Vec::new();

        for badge in self.catalog.satisfied(stats) {
            if self
                .store
                .insert_unlock_if_absent(user_id, badge.id, earned_at)
                .await?
            {
                info!("User {} unlocked badge {} {}", user_id, badge.icon, badge.name);
                newly_unlocked.push(badge.name.clone());
            }
        }

        Ok(newly_unlocked)
    }

    /// [`evaluate`](Self::evaluate) against an open award transaction
    pub fn evaluate_in(
        &self,
        tx: &dyn AwardTx,
        user_id: UserId,
        stats: &UserStats,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<Vec<String>> {
        let mut newly_unlocked = Vec::new();

        for badge in self.catalog.satisfied(stats) {
            if tx.insert_unlock_if_absent(user_id, badge.id, earned_at)? {
                debug!("User {} earns badge {}", user_id, badge.slug);
                newly_unlocked.push(badge.name.clone());
            }
        }

        Ok(newly_unlocked)
    }

    /// Log unlocks once their transaction has committed
    pub fn announce(&self, user_id: UserId, names: &[String]) {
        for badge in self.catalog.badges().iter().filter(|b| names.contains(&b.name)) {
            info!("User {} unlocked badge {} {}", user_id, badge.icon, badge.name);
        }
    }
}
