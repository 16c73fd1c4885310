use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use super::{SqliteStore, insert_once, required_timestamp, to_millis};
use crate::domain::{Badge, BadgeCondition, BadgeId, BadgeUnlock, UserId};
use crate::error::{StoreError, StoreResult};
use crate::store::BadgeStore;

/// Badge row before its condition is decoded
struct BadgeRow {
    id: BadgeId,
    slug: String,
    name: String,
    description: String,
    icon: String,
    condition_kind: String,
    threshold: i64,
}

impl TryFrom<BadgeRow> for Badge {
    type Error = StoreError;

    fn try_from(row: BadgeRow) -> Result<Self, Self::Error> {
        let condition = u64::try_from(row.threshold)
            .ok()
            .and_then(|threshold| BadgeCondition::from_parts(&row.condition_kind, threshold))
            .ok_or_else(|| StoreError::Corrupt {
                table: "badges",
                reason: format!(
                    "badge '{}' has invalid condition {} {}",
                    row.slug, row.condition_kind, row.threshold
                ),
            })?;

        Ok(Badge {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            icon: row.icon,
            condition,
        })
    }
}

pub(super) fn insert_unlock(
    conn: &Connection,
    user_id: UserId,
    badge_id: BadgeId,
    earned_at: DateTime<Utc>,
) -> StoreResult<bool> {
    insert_once(
        conn,
        "INSERT INTO user_badges (user_id, badge_id, earned_at) VALUES (?1, ?2, ?3)",
        params![user_id, badge_id, to_millis(earned_at)],
    )
}

#[async_trait]
impl BadgeStore for SqliteStore {
    async fn list_all(&self) -> StoreResult<Vec<Badge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, slug, name, description, icon, condition_kind, threshold
             FROM badges ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(BadgeRow {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    icon: row.get(4)?,
                    condition_kind: row.get(5)?,
                    threshold: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(Badge::try_from).collect()
    }

    async fn insert_unlock_if_absent(
        &self,
        user_id: UserId,
        badge_id: BadgeId,
        earned_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        insert_unlock(&*self.conn()?, user_id, badge_id, earned_at)
    }

    async fn list_unlocked(&self, user_id: UserId) -> StoreResult<Vec<BadgeUnlock>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, badge_id, earned_at FROM user_badges
             WHERE user_id = ?1 ORDER BY earned_at, badge_id",
        )?;
        let unlocks = stmt
            .query_map([user_id], |row| {
                Ok(BadgeUnlock {
                    user_id: row.get(0)?,
                    badge_id: row.get(1)?,
                    earned_at: required_timestamp(row, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(unlocks)
    }
}
