//! Shared test utilities for engine integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use rusqlite::params;
use tempfile::TempDir;

use taskxp::GamificationEngine;
use taskxp::gamification::FixedClock;
use taskxp::store::SqliteStore;

/// Default instant for tests: a Tuesday mid-morning, UTC
pub const START: &str = "2025-11-18T10:00:00+00:00";

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("Invalid test timestamp")
}

/// Database in a temp dir, a pinned clock and an engine over both
pub struct TestEnv {
    pub dir: TempDir,
    pub store: SqliteStore,
    pub clock: Arc<FixedClock>,
    pub engine: GamificationEngine,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::starting_at(START).await
    }

    pub async fn starting_at(now: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store =
            SqliteStore::open(&dir.path().join("taskxp.db")).expect("Failed to open test db");
        let clock = Arc::new(FixedClock::new(at(now)));
        let engine = GamificationEngine::new(store.stores(), clock.clone())
            .await
            .expect("Failed to build engine");

        Self {
            dir,
            store,
            clock,
            engine,
        }
    }

    pub fn insert_user(&self, username: &str) -> i64 {
        let conn = self.store.conn().expect("Failed to lock db");
        conn.execute("INSERT INTO users (username) VALUES (?1)", [username])
            .expect("Failed to insert user");
        conn.last_insert_rowid()
    }

    pub fn insert_task(&self, user_id: i64, points: u32) -> i64 {
        let conn = self.store.conn().expect("Failed to lock db");
        conn.execute(
            "INSERT INTO tasks (user_id, title, points) VALUES (?1, ?2, ?3)",
            params![user_id, format!("task worth {points}"), points],
        )
        .expect("Failed to insert task");
        conn.last_insert_rowid()
    }

    pub fn insert_challenge(&self, date: &str, points: u32) -> i64 {
        let conn = self.store.conn().expect("Failed to lock db");
        conn.execute(
            "INSERT INTO challenges (title, description, points, date) VALUES (?1, ?2, ?3, ?4)",
            params!["Daily challenge", "Do the thing", points, date],
        )
        .expect("Failed to insert challenge");
        conn.last_insert_rowid()
    }

    /// Overwrite progression fields directly
    pub fn set_user_stats(
        &self,
        user_id: i64,
        xp: u64,
        streak: u32,
        longest_streak: u32,
        last_activity_at: Option<&str>,
    ) {
        let last_ms = last_activity_at.map(|s| at(s).timestamp_millis());
        let level = xp / 100 + 1;
        let conn = self.store.conn().expect("Failed to lock db");
        conn.execute(
            "UPDATE users SET xp = ?2, level = ?3, streak = ?4, longest_streak = ?5,
             last_activity_at = ?6 WHERE id = ?1",
            params![user_id, xp as i64, level as i64, streak, longest_streak, last_ms],
        )
        .expect("Failed to set user stats");
    }

    pub fn count(&self, sql: &str) -> i64 {
        let conn = self.store.conn().expect("Failed to lock db");
        conn.query_row(sql, [], |r| r.get(0))
            .expect("Failed to count")
    }
}
