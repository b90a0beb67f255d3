//! Database module - SQLite session store
//!
//! Append-only: sessions are inserted once and read back in bulk, newest
//! first, scoped to a single user.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

use crate::workout::{WorkoutPayload, WorkoutSession};

const SESSION_COLUMNS: &str = "id, user_id, created_at, workout";

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!("Opened session store at {}", path);
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                workout TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_created
                ON workouts (user_id, created_at)",
            [],
        )?;

        Ok(())
    }

    /// Append a completed workout, returns its id
    pub fn add_session(
        &self,
        user_id: &str,
        workout: &WorkoutPayload,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let json = serde_json::to_string(workout)?;
        self.conn.execute(
            "INSERT INTO workouts (user_id, created_at, workout) VALUES (?1, ?2, ?3)",
            params![
                user_id,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                json,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Stored session {} for {}", id, user_id);
        Ok(id)
    }

    /// All sessions of a user, newest first
    pub fn get_sessions(&self, user_id: &str) -> Result<Vec<WorkoutSession>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM workouts WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            SESSION_COLUMNS
        ))?;

        let sessions = stmt
            .query_map([user_id], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Most recent session of a user
    pub fn last_session(&self, user_id: &str) -> Result<Option<WorkoutSession>> {
        let session = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM workouts WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                    SESSION_COLUMNS
                ),
                [user_id],
                session_from_row,
            )
            .optional()?;

        Ok(session)
    }
}

/// Decode one row; unreadable columns degrade to neutral values
fn session_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutSession> {
    let id: i64 = row.get(0)?;
    let created_str: String = row.get(2)?;
    let workout_str: String = row.get(3)?;

    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Session {} has unreadable created_at {:?}: {}", id, created_str, e);
            DateTime::<Utc>::UNIX_EPOCH
        });

    let workout = serde_json::from_str::<WorkoutPayload>(&workout_str).unwrap_or_else(|e| {
        warn!("Session {} has unreadable workout JSON: {}", id, e);
        WorkoutPayload::Empty
    });

    Ok(WorkoutSession {
        id: Some(id),
        user_id: row.get(1)?,
        created_at,
        workout,
    })
}
