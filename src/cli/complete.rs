//! Task and challenge completion commands

use anyhow::Result;

use taskxp::GamificationEngine;
use taskxp::domain::{ChallengeId, TaskId, UserId};

use super::print_json;

/// Complete a task and print the award
pub async fn complete_task_command(engine: &GamificationEngine, task_id: TaskId) -> Result<()> {
    let completion = engine.complete_task(task_id).await?;
    print_json(&completion)
}

/// Complete a challenge for a user and print the outcome
pub async fn complete_challenge_command(
    engine: &GamificationEngine,
    challenge_id: ChallengeId,
    user_id: UserId,
) -> Result<()> {
    let outcome = engine.complete_challenge(challenge_id, user_id).await?;
    print_json(&outcome)
}
