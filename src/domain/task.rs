use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Unique identifier for a task
pub type TaskId = i64;

/// A to-do item owned by exactly one user
///
/// `done` flips from `false` to `true` at most once; `completed_at` is set in
/// the same write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    /// XP granted on completion (always positive)
    pub points: u32,
    pub done: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
