use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a user
pub type UserId = i64;

/// A player and the progression fields the engine owns
///
/// `xp`, `level`, `streak`, `longest_streak` and `last_activity_at` are only
/// ever written by the engine's award operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Total experience points, never decreases
    pub xp: u64,
    /// Always `xp / 100 + 1`
    pub level: u32,
    /// Consecutive calendar days with a completed task
    pub streak: u32,
    /// Best streak ever reached, `>= streak`
    pub longest_streak: u32,
    /// Time of the last task completion
    pub last_activity_at: Option<DateTime<Utc>>,
}
