//! Table definitions and catalog seeding

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::StoreResult;
use crate::gamification::DEFAULT_BADGES;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
    level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
    streak INTEGER NOT NULL DEFAULT 0 CHECK (streak >= 0),
    longest_streak INTEGER NOT NULL DEFAULT 0 CHECK (longest_streak >= streak),
    last_activity_at INTEGER          -- Unix millis, UTC
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 10 CHECK (points > 0),
    done INTEGER NOT NULL DEFAULT 0,
    completed_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);

CREATE TABLE IF NOT EXISTS challenges (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    points INTEGER NOT NULL CHECK (points > 0),
    date TEXT NOT NULL                -- YYYY-MM-DD
);
CREATE INDEX IF NOT EXISTS idx_challenges_date ON challenges(date);

CREATE TABLE IF NOT EXISTS badges (
    id INTEGER PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    icon TEXT NOT NULL DEFAULT '',
    condition_kind TEXT NOT NULL,
    threshold INTEGER NOT NULL
);

-- Append-only
CREATE TABLE IF NOT EXISTS user_badges (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    badge_id INTEGER NOT NULL REFERENCES badges(id),
    earned_at INTEGER NOT NULL,
    UNIQUE (user_id, badge_id)
);

-- Append-only
CREATE TABLE IF NOT EXISTS user_challenges (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    challenge_id INTEGER NOT NULL REFERENCES challenges(id),
    points_earned INTEGER NOT NULL,
    completed_at INTEGER NOT NULL,
    UNIQUE (user_id, challenge_id)
);
"#;

/// Create tables, record the version and seed the badge catalog
pub(super) fn init(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    if version < SCHEMA_VERSION {
        conn.execute(
            "INSERT OR REPLACE INTO schema_version VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
        debug!("Database schema at version {}", SCHEMA_VERSION);
    }

    seed_badges(conn)
}

/// Insert missing default badges; existing rows are left alone
fn seed_badges(conn: &Connection) -> StoreResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO badges (slug, name, description, icon, condition_kind, threshold)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    let mut seeded = 0;
    for def in DEFAULT_BADGES {
        seeded += stmt.execute(params![
            def.slug,
            def.name,
            def.description,
            def.icon,
            def.condition.kind(),
            super::to_sql_int(def.condition.threshold()),
        ])?;
    }
    if seeded > 0 {
        debug!("Seeded {} badges", seeded);
    }
    Ok(())
}
