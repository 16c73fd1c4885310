use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::{SqliteStore, timestamp, to_millis, unsigned};
use crate::domain::{Task, TaskId};
use crate::error::StoreResult;
use crate::store::TaskStore;

pub(super) fn mark_done(
    conn: &Connection,
    id: TaskId,
    completed_at: DateTime<Utc>,
) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE tasks SET done = 1, completed_at = ?2 WHERE id = ?1 AND done = 0",
        params![id, to_millis(completed_at)],
    )?;
    Ok(changed == 1)
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn get_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                "SELECT id, user_id, title, points, done, completed_at FROM tasks WHERE id = ?1",
                [id],
                |row| {
                    Ok(Task {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        points: unsigned(row, 3)?,
                        done: row.get(4)?,
                        completed_at: timestamp(row, 5)?,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }

    async fn mark_done(&self, id: TaskId, completed_at: DateTime<Utc>) -> StoreResult<bool> {
        mark_done(&*self.conn()?, id, completed_at)
    }
}
