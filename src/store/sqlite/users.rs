use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{SqliteStore, timestamp, to_millis, to_sql_int, unsigned};
use crate::domain::{User, UserId};
use crate::error::StoreResult;
use crate::gamification::XP_PER_LEVEL;
use crate::store::UserStore;

const USER_COLUMNS: &str = "id, username, xp, level, streak, longest_streak, last_activity_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        xp: unsigned(row, 2)?,
        level: unsigned(row, 3)?,
        streak: unsigned(row, 4)?,
        longest_streak: unsigned(row, 5)?,
        last_activity_at: timestamp(row, 6)?,
    })
}

pub(super) fn get_user(conn: &Connection, id: UserId) -> StoreResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// `xp` on the right-hand side is the pre-update value, so the level is
/// derived from the new total.
pub(super) fn add_xp(conn: &Connection, id: UserId, amount: u64) -> StoreResult<Option<u64>> {
    let new_xp = conn
        .query_row(
            "UPDATE users SET
                xp = xp + ?1,
                level = MAX(level, (xp + ?1) / ?3 + 1)
             WHERE id = ?2 RETURNING xp",
            params![to_sql_int(amount), id, to_sql_int(XP_PER_LEVEL)],
            |row| unsigned::<u64>(row, 0),
        )
        .optional()?;
    Ok(new_xp)
}

pub(super) fn set_streak(
    conn: &Connection,
    id: UserId,
    streak: u32,
    longest_streak: u32,
    last_activity_at: DateTime<Utc>,
) -> StoreResult<()> {
    conn.execute(
        "UPDATE users SET
            streak = ?2,
            longest_streak = MAX(longest_streak, ?3, ?2),
            last_activity_at = ?4
         WHERE id = ?1",
        params![id, streak, longest_streak, to_millis(last_activity_at)],
    )?;
    Ok(())
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        get_user(&*self.conn()?, id)
    }

    async fn atomic_increment_xp(&self, id: UserId, amount: u64) -> StoreResult<Option<u64>> {
        add_xp(&*self.conn()?, id, amount)
    }

    async fn set_level_streak(
        &self,
        id: UserId,
        level: u32,
        streak: u32,
        longest_streak: u32,
        last_activity_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET
                level = MAX(level, ?2),
                streak = ?3,
                longest_streak = MAX(longest_streak, ?4, ?3),
                last_activity_at = ?5
             WHERE id = ?1",
            params![id, level, streak, longest_streak, to_millis(last_activity_at)],
        )?;
        Ok(())
    }

    async fn top_by_xp(&self, limit: u32) -> StoreResult<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY xp DESC, id ASC LIMIT ?1"
        ))?;
        let users = stmt
            .query_map([limit], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
