//! Gamification engine entry points
//!
//! [`GamificationEngine`] wires the stores, the badge catalog and a clock
//! together and exposes the operations callers use.

mod challenge;
mod progress;
mod task;

pub use challenge::{
    ChallengeCompletionOrchestrator, ChallengeCompletionOutcome, MSG_ALREADY_COMPLETED,
    MSG_CHALLENGE_NOT_FOUND, MSG_COMPLETED,
};
pub use progress::{EarnedBadge, LeaderboardEntry, ProgressReport};
pub use task::{TaskCompletion, TaskCompletionOrchestrator};

use std::sync::Arc;

use crate::domain::{Badge, Challenge, ChallengeId, TaskId, UserId};
use crate::error::{EngineError, EngineResult};
use crate::gamification::{BadgeCatalog, BadgeEvaluator, Clock};
use crate::store::Stores;

#[derive(Clone)]
pub struct GamificationEngine {
    stores: Stores,
    catalog: Arc<BadgeCatalog>,
    clock: Arc<dyn Clock>,
    tasks: TaskCompletionOrchestrator,
    challenges: ChallengeCompletionOrchestrator,
}

impl GamificationEngine {
    /// Build the engine, loading the badge catalog once
    pub async fn new(stores: Stores, clock: Arc<dyn Clock>) -> EngineResult<Self> {
        let catalog = Arc::new(BadgeCatalog::load(&*stores.badges).await?);
        let evaluator = BadgeEvaluator::new(catalog.clone(), stores.badges.clone());

        let tasks = TaskCompletionOrchestrator::new(
            stores.tasks.clone(),
            stores.users.clone(),
            stores.awards.clone(),
            evaluator,
            clock.clone(),
        );
        let challenges = ChallengeCompletionOrchestrator::new(
            stores.challenges.clone(),
            stores.completions.clone(),
            stores.users.clone(),
            stores.awards.clone(),
            clock.clone(),
        );

        Ok(Self {
            stores,
            catalog,
            clock,
            tasks,
            challenges,
        })
    }

    pub async fn complete_task(&self, task_id: TaskId) -> EngineResult<TaskCompletion> {
        self.tasks.complete_task(task_id).await
    }

    pub async fn complete_challenge(
        &self,
        challenge_id: ChallengeId,
        user_id: UserId,
    ) -> EngineResult<ChallengeCompletionOutcome> {
        self.challenges
            .complete_challenge(challenge_id, user_id)
            .await
    }

    /// Progression summary of a user, with earned badges
    pub async fn progress(&self, user_id: UserId) -> EngineResult<ProgressReport> {
        let user = self
            .stores
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("User", user_id))?;
        let unlocks = self.stores.badges.list_unlocked(user_id).await?;
        let badges = progress::earned_badges(&self.catalog, unlocks);
        Ok(ProgressReport::new(user, badges))
    }

    /// Top users by XP
    pub async fn leaderboard(&self, limit: u32) -> EngineResult<Vec<LeaderboardEntry>> {
        let users = self.stores.users.top_by_xp(limit).await?;
        Ok(progress::rank(users))
    }

    /// Challenge offered on the clock's current day
    pub async fn today_challenge(&self) -> EngineResult<Option<Challenge>> {
        let today = self.clock.now().date_naive();
        Ok(self.stores.challenges.find_by_date(today).await?)
    }

    pub fn badge_catalog(&self) -> &[Badge] {
        self.catalog.badges()
    }
}
