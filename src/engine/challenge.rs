//! Daily challenge completion

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{ChallengeId, UserId};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::gamification::{Clock, XpAward, award_xp, level_for_xp};
use crate::store::{AwardStore, AwardTx, ChallengeCompletionStore, ChallengeStore, UserStore};

pub const MSG_CHALLENGE_NOT_FOUND: &str = "Challenge introuvable";
pub const MSG_ALREADY_COMPLETED: &str = "Challenge déjà complété";
pub const MSG_COMPLETED: &str = "Challenge complété";

/// Outcome of a challenge completion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCompletionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_gained: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u32>,
    pub leveled_up: bool,
}

impl ChallengeCompletionOutcome {
    fn not_found() -> Self {
        Self {
            success: false,
            message: MSG_CHALLENGE_NOT_FOUND.to_string(),
            points_earned: None,
            xp_gained: None,
            new_level: None,
            leveled_up: false,
        }
    }

    fn already_completed() -> Self {
        Self {
            success: false,
            message: MSG_ALREADY_COMPLETED.to_string(),
            points_earned: Some(0),
            xp_gained: None,
            new_level: None,
            leveled_up: false,
        }
    }
}

/// Applies the effects of completing a challenge
#[derive(Clone)]
pub struct ChallengeCompletionOrchestrator {
    challenges: Arc<dyn ChallengeStore>,
    completions: Arc<dyn ChallengeCompletionStore>,
    users: Arc<dyn UserStore>,
    awards: Arc<dyn AwardStore>,
    clock: Arc<dyn Clock>,
}

impl ChallengeCompletionOrchestrator {
    pub fn new(
        challenges: Arc<dyn ChallengeStore>,
        completions: Arc<dyn ChallengeCompletionStore>,
        users: Arc<dyn UserStore>,
        awards: Arc<dyn AwardStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenges,
            completions,
            users,
            awards,
            clock,
        }
    }

    /// Complete a challenge for a user
    ///
    /// A missing challenge or a repeated completion is reported in the
    /// outcome, not as an error. Only a missing user is an error. The
    /// completion row and the XP are committed together.
    pub async fn complete_challenge(
        &self,
        challenge_id: ChallengeId,
        user_id: UserId,
    ) -> EngineResult<ChallengeCompletionOutcome> {
        let Some(challenge) = self.challenges.get_by_id(challenge_id).await? else {
            debug!("Challenge {} not found", challenge_id);
            return Ok(ChallengeCompletionOutcome::not_found());
        };
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::not_found("User", user_id));
        }

        if self
            .completions
            .find_by_user_and_challenge(user_id, challenge_id)
            .await?
            .is_some()
        {
            debug!("User {} already completed challenge {}", user_id, challenge_id);
            return Ok(ChallengeCompletionOutcome::already_completed());
        }

        let now = self.clock.now().with_timezone(&Utc);
        let amount = u64::from(challenge.points);
        let mut award: Option<XpAward> = None;
        let mut user_missing = false;

        self.awards
            .in_transaction(&mut |tx: &dyn AwardTx| {
                user_missing = tx.get_user(user_id)?.is_none();
                if user_missing
                    || !tx.insert_completion_if_absent(user_id, challenge_id, challenge.points, now)?
                {
                    return Ok(());
                }
                let new_xp = tx.add_xp(user_id, amount)?.ok_or_else(|| StoreError::Corrupt {
                    table: "users",
                    reason: format!("user {user_id} disappeared during award"),
                })?;
                let previous_xp = new_xp.saturating_sub(amount);
                award = Some(award_xp(previous_xp, level_for_xp(previous_xp), amount));
                Ok(())
            })
            .await?;

        if user_missing {
            return Err(EngineError::not_found("User", user_id));
        }
        let Some(award) = award else {
            warn!(
                "Challenge {} was completed concurrently for user {}, skipping award",
                challenge_id, user_id
            );
            return Ok(ChallengeCompletionOutcome::already_completed());
        };

        if award.leveled_up {
            info!("User {} reached level {}", user_id, award.new_level);
        }
        info!(
            "User {} completed challenge {}: +{} XP (total {})",
            user_id, challenge_id, amount, award.new_xp
        );

        Ok(ChallengeCompletionOutcome {
            success: true,
            message: MSG_COMPLETED.to_string(),
            points_earned: Some(challenge.points),
            xp_gained: Some(amount),
            new_level: Some(award.new_level),
            leveled_up: award.leveled_up,
        })
    }
}
