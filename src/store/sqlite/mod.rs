//! SQLite-backed implementation of every store trait
//!
//! One connection behind a mutex, shared by all trait objects handed out by
//! [`SqliteStore::stores`]. Atomicity of the conditional writes comes from
//! SQLite itself (single statements, UNIQUE constraints), not from the mutex.
//! Award writes are grouped in one transaction per completion.

mod awards;
mod badges;
mod challenges;
mod schema;
mod tasks;
mod users;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row};
use tracing::debug;

use super::Stores;
use crate::error::{StoreError, StoreResult, is_unique_violation};

/// Handle to the taskxp database
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!("Opened database at {}", path.display());

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection for direct queries
    pub fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Trait-object handles for the engine, all backed by this connection
    pub fn stores(&self) -> Stores {
        let store = Arc::new(self.clone());
        Stores {
            users: store.clone(),
            tasks: store.clone(),
            challenges: store.clone(),
            badges: store.clone(),
            completions: store.clone(),
            awards: store,
        }
    }
}

/// Run an insert guarded by a UNIQUE constraint
///
/// Returns `false` instead of failing when the row already exists.
fn insert_once<P: Params>(conn: &Connection, sql: &str, params: P) -> StoreResult<bool> {
    match conn.execute(sql, params) {
        Ok(inserted) => Ok(inserted > 0),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, message.into())
}

/// Read a non-negative integer column into a narrower unsigned type
fn unsigned<T: TryFrom<i64>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let value: i64 = row.get(idx)?;
    T::try_from(value).map_err(|_| conversion_error(idx, format!("value {value} out of range")))
}

/// Read a nullable millisecond timestamp column
fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|ms| {
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| conversion_error(idx, format!("timestamp {ms} out of range")))
        })
        .transpose()
}

fn required_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    timestamp(row, idx)?
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(idx, "timestamp".into(), Type::Null))
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Clamp an unsigned amount into SQLite's integer range
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
