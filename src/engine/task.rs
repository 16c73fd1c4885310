//! Task completion: XP, level, streak and badges in one call

use std::sync::Arc;

use chrono::{Timelike, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Task, TaskId, User};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::gamification::{
    BadgeEvaluator, Clock, StreakUpdate, UserStats, XpAward, activity_day, award_xp,
    level_for_xp, update_streak,
};
use crate::store::{AwardStore, AwardTx, TaskStore, UserStore};

/// Outcome of completing a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub task: Task,
    /// The task was already done before this call; nothing was awarded
    pub already_completed: bool,
    pub xp_gained: u64,
    pub new_xp: u64,
    pub new_level: u32,
    pub leveled_up: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub streak_broken: bool,
    pub newly_unlocked_badges: Vec<String>,
}

impl TaskCompletion {
    /// Result for a task that was completed earlier
    fn unchanged(task: Task, user: &User) -> Self {
        Self {
            task,
            already_completed: true,
            xp_gained: 0,
            new_xp: user.xp,
            new_level: level_for_xp(user.xp),
            leveled_up: false,
            streak: user.streak,
            longest_streak: user.longest_streak,
            streak_broken: false,
            newly_unlocked_badges: Vec::new(),
        }
    }
}

/// What the award transaction did
enum Applied {
    Awarded {
        user: User,
        award: XpAward,
        streak: StreakUpdate,
        badges: Vec<String>,
    },
    /// Another call flipped `done` first
    LostRace,
    OwnerMissing,
}

/// Applies the effects of completing a task
#[derive(Clone)]
pub struct TaskCompletionOrchestrator {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    awards: Arc<dyn AwardStore>,
    badges: BadgeEvaluator,
    clock: Arc<dyn Clock>,
}

impl TaskCompletionOrchestrator {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        awards: Arc<dyn AwardStore>,
        badges: BadgeEvaluator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            users,
            awards,
            badges,
            clock,
        }
    }

    /// Complete a task and award its owner
    ///
    /// Completing a task that is already done returns the current state with
    /// zero deltas. When two calls race on the same task only the one that
    /// flips `done` awards anything. The done flag, XP, level, streak and
    /// badge unlocks are committed together or not at all.
    pub async fn complete_task(&self, task_id: TaskId) -> EngineResult<TaskCompletion> {
        let task = self
            .tasks
            .get_by_id(task_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Task", task_id))?;
        let user = self
            .users
            .get_by_id(task.user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("User", task.user_id))?;

        if task.done {
            debug!("Task {} already completed, nothing to award", task_id);
            return Ok(TaskCompletion::unchanged(task, &user));
        }

        let now = self.clock.now();
        let now_utc = now.with_timezone(&Utc);
        let amount = u64::from(task.points);
        let mut applied = Applied::LostRace;

        self.awards
            .in_transaction(&mut |tx: &dyn AwardTx| {
                // Read inside the transaction so the streak sees committed awards
                let Some(user) = tx.get_user(task.user_id)? else {
                    applied = Applied::OwnerMissing;
                    return Ok(());
                };
                if !tx.mark_task_done(task_id, now_utc)? {
                    applied = Applied::LostRace;
                    return Ok(());
                }

                let new_xp = tx.add_xp(user.id, amount)?.ok_or_else(|| StoreError::Corrupt {
                    table: "users",
                    reason: format!("user {} disappeared during award", user.id),
                })?;
                let previous_xp = new_xp.saturating_sub(amount);
                let award = award_xp(previous_xp, level_for_xp(previous_xp), amount);

                let last_day = user
                    .last_activity_at
                    .map(|at| activity_day(at, now.offset()));
                let streak =
                    update_streak(last_day, now.date_naive(), user.streak, user.longest_streak);
                tx.set_streak(user.id, streak.streak, streak.longest_streak, now_utc)?;

                let stats = UserStats {
                    xp: award.new_xp,
                    streak: streak.streak,
                    level: award.new_level,
                    last_activity_hour: Some(now.hour()),
                };
                let badges = self.badges.evaluate_in(tx, user.id, &stats, now_utc)?;

                applied = Applied::Awarded {
                    user,
                    award,
                    streak,
                    badges,
                };
                Ok(())
            })
            .await?;

        let (user, award, streak, newly_unlocked_badges) = match applied {
            Applied::Awarded {
                user,
                award,
                streak,
                badges,
            } => (user, award, streak, badges),
            Applied::LostRace => {
                warn!("Task {} was completed concurrently, skipping award", task_id);
                return self.reload_unchanged(task, user).await;
            }
            Applied::OwnerMissing => {
                return Err(EngineError::not_found("User", task.user_id));
            }
        };

        info!(
            "User {} completed task {}: +{} XP (total {})",
            user.id, task_id, amount, award.new_xp
        );
        if award.leveled_up {
            info!("User {} reached level {}", user.id, award.new_level);
        }
        if streak.streak_broken {
            info!("User {} streak reset after {} days", user.id, user.streak);
        }
        self.badges.announce(user.id, &newly_unlocked_badges);

        Ok(TaskCompletion {
            task: Task {
                done: true,
                completed_at: Some(now_utc),
                ..task
            },
            already_completed: false,
            xp_gained: amount,
            new_xp: award.new_xp,
            new_level: award.new_level,
            leveled_up: award.leveled_up,
            streak: streak.streak,
            longest_streak: streak.longest_streak,
            streak_broken: streak.streak_broken,
            newly_unlocked_badges,
        })
    }

    /// Re-read task and user after losing the `done` race
    async fn reload_unchanged(&self, task: Task, user: User) -> EngineResult<TaskCompletion> {
        let task = self.tasks.get_by_id(task.id).await?.unwrap_or(task);
        let user = self.users.get_by_id(user.id).await?.unwrap_or(user);
        Ok(TaskCompletion::unchanged(task, &user))
    }
}
