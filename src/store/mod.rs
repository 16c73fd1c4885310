//! Record stores consumed by the engine
//!
//! Each trait covers one table family. Implementations must make the
//! `*_if_absent` inserts and [`TaskStore::mark_done`] atomic: the boolean they
//! return is the only signal the engine uses to decide whether to award.
//!
//! Completions go through [`AwardStore`], which runs every write of one award
//! inside a single transaction.

mod sqlite;

pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    Badge, BadgeId, BadgeUnlock, Challenge, ChallengeCompletion, ChallengeId, Task, TaskId, User,
    UserId,
};
use crate::error::StoreResult;

/// Users and their progression fields
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Add `amount` XP in a single atomic write
    ///
    /// The stored level is raised to match the new total in the same
    /// statement. Returns the XP total after the increment, or `None` if the
    /// user does not exist.
    async fn atomic_increment_xp(&self, id: UserId, amount: u64) -> StoreResult<Option<u64>>;

    /// Persist derived progression fields
    ///
    /// `level` and `longest_streak` only move forward.
    async fn set_level_streak(
        &self,
        id: UserId,
        level: u32,
        streak: u32,
        longest_streak: u32,
        last_activity_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Users ordered by XP descending, ties by id
    async fn top_by_xp(&self, limit: u32) -> StoreResult<Vec<User>>;
}

/// User tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_by_id(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Flip `done` to true if it is still false
    ///
    /// Returns `true` only for the call that performed the transition.
    async fn mark_done(&self, id: TaskId, completed_at: DateTime<Utc>) -> StoreResult<bool>;
}

/// Dated challenge catalog
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn get_by_id(&self, id: ChallengeId) -> StoreResult<Option<Challenge>>;

    async fn find_by_date(&self, date: NaiveDate) -> StoreResult<Option<Challenge>>;
}

/// Badge catalog and per-user unlocks
#[async_trait]
pub trait BadgeStore: Send + Sync {
    async fn list_all(&self) -> StoreResult<Vec<Badge>>;

    /// Record an unlock unless one exists for (user, badge)
    ///
    /// Returns `true` if this call created the row.
    async fn insert_unlock_if_absent(
        &self,
        user_id: UserId,
        badge_id: BadgeId,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Unlocks of a user, oldest first
    async fn list_unlocked(&self, user_id: UserId) -> StoreResult<Vec<BadgeUnlock>>;
}

/// Per-user challenge completions
#[async_trait]
pub trait ChallengeCompletionStore: Send + Sync {
    /// Record a completion unless one exists for (user, challenge)
    ///
    /// Returns `true` if this call created the row.
    async fn insert_if_absent(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        points_earned: u32,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    async fn find_by_user_and_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> StoreResult<Option<ChallengeCompletion>>;
}

/// Writes available inside an award transaction
///
/// Same semantics as the matching async store methods, but synchronous and
/// bound to the open transaction.
pub trait AwardTx {
    fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Flip `done` to true if it is still false
    fn mark_task_done(&self, id: TaskId, completed_at: DateTime<Utc>) -> StoreResult<bool>;

    fn insert_completion_if_absent(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        points_earned: u32,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Add XP and raise the stored level in one statement
    fn add_xp(&self, id: UserId, amount: u64) -> StoreResult<Option<u64>>;

    fn set_streak(
        &self,
        id: UserId,
        streak: u32,
        longest_streak: u32,
        last_activity_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    fn insert_unlock_if_absent(
        &self,
        user_id: UserId,
        badge_id: BadgeId,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<bool>;
}

/// Closure run inside [`AwardStore::in_transaction`]
pub type AwardWork<'a> = dyn FnMut(&dyn AwardTx) -> StoreResult<()> + Send + 'a;

/// Runs a completion as one unit
#[async_trait]
pub trait AwardStore: Send + Sync {
    /// Run `work` in a transaction
    ///
    /// Commits only if `work` returns `Ok`. On error nothing it wrote is kept.
    async fn in_transaction(&self, work: &mut AwardWork<'_>) -> StoreResult<()>;
}

/// Bundle of store handles handed to the engine
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub challenges: Arc<dyn ChallengeStore>,
    pub badges: Arc<dyn BadgeStore>,
    pub completions: Arc<dyn ChallengeCompletionStore>,
    pub awards: Arc<dyn AwardStore>,
}
