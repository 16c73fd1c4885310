use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Unique identifier for a challenge
pub type ChallengeId = i64;

/// A dated catalog entry, shared by every user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub points: u32,
    /// Calendar day the challenge is offered on
    pub date: NaiveDate,
}

/// Append-only record of a user finishing a challenge
///
/// At most one exists per (user, challenge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCompletion {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub completed_at: DateTime<Utc>,
    pub points_earned: u32,
}
