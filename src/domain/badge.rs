//! Badge catalog entries and their unlock conditions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Unique identifier for a badge
pub type BadgeId = i64;

/// Declarative unlock condition of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum BadgeCondition {
    /// Total XP reached the threshold
    XpAtLeast(u64),
    /// Current daily streak reached the threshold
    StreakAtLeast(u32),
    /// Level reached the threshold
    LevelAtLeast(u32),
    /// Last activity happened before this hour of the day (0-23)
    ActiveBeforeHour(u32),
}

impl BadgeCondition {
    /// Storage name of the condition kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::XpAtLeast(_) => "xp_at_least",
            Self::StreakAtLeast(_) => "streak_at_least",
            Self::LevelAtLeast(_) => "level_at_least",
            Self::ActiveBeforeHour(_) => "active_before_hour",
        }
    }

    /// Threshold value stored next to the kind
    pub fn threshold(&self) -> u64 {
        match *self {
            Self::XpAtLeast(xp) => xp,
            Self::StreakAtLeast(n) | Self::LevelAtLeast(n) | Self::ActiveBeforeHour(n) => {
                u64::from(n)
            }
        }
    }

    /// Rebuild a condition from its stored parts
    pub fn from_parts(kind: &str, threshold: u64) -> Option<Self> {
        let small = u32::try_from(threshold).ok();
        match kind {
            "xp_at_least" => Some(Self::XpAtLeast(threshold)),
            "streak_at_least" => small.map(Self::StreakAtLeast),
            "level_at_least" => small.map(Self::LevelAtLeast),
            "active_before_hour" => small.filter(|h| *h <= 24).map(Self::ActiveBeforeHour),
            _ => None,
        }
    }
}

/// A badge definition from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    /// Stable identifier, e.g. `first_task`
    pub slug: String,
    /// Display name, e.g. `First-task`
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: BadgeCondition,
}

/// Append-only record of a user earning a badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeUnlock {
    pub user_id: UserId,
    pub badge_id: BadgeId,
    pub earned_at: DateTime<Utc>,
}
