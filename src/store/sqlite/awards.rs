use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

use super::{SqliteStore, badges, challenges, tasks, users};
use crate::domain::{BadgeId, ChallengeId, TaskId, User, UserId};
use crate::error::StoreResult;
use crate::store::{AwardStore, AwardTx, AwardWork};

impl AwardTx for Connection {
    fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        users::get_user(self, id)
    }

    fn mark_task_done(&self, id: TaskId, completed_at: DateTime<Utc>) -> StoreResult<bool> {
        tasks::mark_done(self, id, completed_at)
    }

    fn insert_completion_if_absent(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        points_earned: u32,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        challenges::insert_completion(self, user_id, challenge_id, points_earned, completed_at)
    }

    fn add_xp(&self, id: UserId, amount: u64) -> StoreResult<Option<u64>> {
        users::add_xp(self, id, amount)
    }

    fn set_streak(
        &self,
        id: UserId,
        streak: u32,
        longest_streak: u32,
        last_activity_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        users::set_streak(self, id, streak, longest_streak, last_activity_at)
    }

    fn insert_unlock_if_absent(
        &self,
        user_id: UserId,
        badge_id: BadgeId,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        badges::insert_unlock(self, user_id, badge_id, earned_at)
    }
}

#[async_trait]
impl AwardStore for SqliteStore {
    async fn in_transaction(&self, work: &mut AwardWork<'_>) -> StoreResult<()> {
        let mut conn = self.conn()?;
        // Take the write lock up front so reads inside `work` stay current
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        work(&*tx)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::sqlite::test_support::{insert_challenge, insert_task, insert_user, store};
    use crate::store::{TaskStore, UserStore};

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_763_460_000_000).unwrap()
    }

    #[tokio::test]
    async fn test_commit_keeps_all_writes() {
        let store = store();
        let user = insert_user(&store, "alice");
        let task = insert_task(&store, user, 10);

        store
            .in_transaction(&mut |tx: &dyn AwardTx| {
                assert!(tx.mark_task_done(task, at())?);
                assert_eq!(tx.add_xp(user, 120)?, Some(120));
                tx.set_streak(user, 1, 1, at())?;
                assert!(tx.insert_unlock_if_absent(user, 1, at())?);
                Ok(())
            })
            .await
            .unwrap();

        let saved = UserStore::get_by_id(&store, user).await.unwrap().unwrap();
        assert_eq!(saved.xp, 120);
        assert_eq!(saved.level, 2);
        assert_eq!(saved.streak, 1);
        assert_eq!(saved.last_activity_at, Some(at()));
        assert!(TaskStore::get_by_id(&store, task).await.unwrap().unwrap().done);
    }

    #[tokio::test]
    async fn test_error_rolls_back_every_write() {
        let store = store();
        let user = insert_user(&store, "alice");
        let task = insert_task(&store, user, 10);

        let result = store
            .in_transaction(&mut |tx: &dyn AwardTx| {
                tx.mark_task_done(task, at())?;
                tx.add_xp(user, 10)?;
                tx.insert_unlock_if_absent(user, 1, at())?;
                Err(StoreError::LockPoisoned)
            })
            .await;
        assert!(matches!(result, Err(StoreError::LockPoisoned)));

        let saved = UserStore::get_by_id(&store, user).await.unwrap().unwrap();
        assert_eq!(saved.xp, 0);
        assert_eq!(saved.level, 1);
        assert!(!TaskStore::get_by_id(&store, task).await.unwrap().unwrap().done);
        let unlocks: i64 = store
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user_badges", [], |row| row.get(0))
            .unwrap();
        assert_eq!(unlocks, 0);
    }

    #[tokio::test]
    async fn test_conditional_writes_inside_transaction() {
        let store = store();
        let user = insert_user(&store, "alice");
        let task = insert_task(&store, user, 10);
        let challenge = insert_challenge(&store, "2025-11-18", 50);

        store
            .in_transaction(&mut |tx: &dyn AwardTx| {
                assert!(tx.mark_task_done(task, at())?);
                assert!(!tx.mark_task_done(task, at())?);
                assert!(tx.insert_completion_if_absent(user, challenge, 50, at())?);
                assert!(!tx.insert_completion_if_absent(user, challenge, 50, at())?);
                assert!(tx.add_xp(user + 1, 5)?.is_none());
                assert!(tx.get_user(user)?.is_some());
                Ok(())
            })
            .await
            .unwrap();
    }
}
