use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{SqliteStore, insert_once, required_timestamp, to_millis, unsigned};
use crate::domain::{Challenge, ChallengeCompletion, ChallengeId, UserId};
use crate::error::StoreResult;
use crate::store::{ChallengeCompletionStore, ChallengeStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn challenge_from_row(row: &Row<'_>) -> rusqlite::Result<Challenge> {
    let raw_date: String = row.get(4)?;
    let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Challenge {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        points: unsigned(row, 3)?,
        date,
    })
}

#[async_trait]
impl ChallengeStore for SqliteStore {
    async fn get_by_id(&self, id: ChallengeId) -> StoreResult<Option<Challenge>> {
        let conn = self.conn()?;
        let challenge = conn
            .query_row(
                "SELECT id, title, description, points, date FROM challenges WHERE id = ?1",
                [id],
                challenge_from_row,
            )
            .optional()?;
        Ok(challenge)
    }

    async fn find_by_date(&self, date: NaiveDate) -> StoreResult<Option<Challenge>> {
        let conn = self.conn()?;
        let challenge = conn
            .query_row(
                "SELECT id, title, description, points, date FROM challenges
                 WHERE date = ?1 ORDER BY id LIMIT 1",
                [date.format(DATE_FORMAT).to_string()],
                challenge_from_row,
            )
            .optional()?;
        Ok(challenge)
    }
}

pub(super) fn insert_completion(
    conn: &Connection,
    user_id: UserId,
    challenge_id: ChallengeId,
    points_earned: u32,
    completed_at: DateTime<Utc>,
) -> StoreResult<bool> {
    insert_once(
        conn,
        "INSERT INTO user_challenges (user_id, challenge_id, points_earned, completed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![user_id, challenge_id, points_earned, to_millis(completed_at)],
    )
}

#[async_trait]
impl ChallengeCompletionStore for SqliteStore {
    async fn insert_if_absent(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        points_earned: u32,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        insert_completion(&*self.conn()?, user_id, challenge_id, points_earned, completed_at)
    }

    async fn find_by_user_and_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> StoreResult<Option<ChallengeCompletion>> {
        let conn = self.conn()?;
        let completion = conn
            .query_row(
                "SELECT user_id, challenge_id, completed_at, points_earned FROM user_challenges
                 WHERE user_id = ?1 AND challenge_id = ?2",
                [user_id, challenge_id],
                |row| {
                    Ok(ChallengeCompletion {
                        user_id: row.get(0)?,
                        challenge_id: row.get(1)?,
                        completed_at: required_timestamp(row, 2)?,
                        points_earned: unsigned(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(completion)
    }
}
