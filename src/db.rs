//! Database module
//!
//! Persists transfers and the interview state attached to each of them.

mod schema;

pub use schema::*;

use crate::interview::{persistence, InterviewState};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Transfer not found: {0}")]
    TransferNotFound(i64),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
    #[error("Cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    // ==================== Transfer Operations ====================

    /// Create a new transfer with no interview yet
    pub fn create_transfer(&self, title: &str) -> DbResult<Transfer> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO transfers (title, manager_instructions, created_at, updated_at)
             VALUES (?1, NULL, ?2, ?2)",
            params![title, now.to_rfc3339()],
        )?;

        Ok(Transfer {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            manager_instructions: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get transfer by ID
    pub fn get_transfer(&self, id: i64) -> DbResult<Transfer> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, title, manager_instructions, created_at, updated_at
             FROM transfers WHERE id = ?1",
            params![id],
            transfer_from_row,
        )
        .optional()?
        .ok_or(DbError::TransferNotFound(id))
    }

    /// All transfers, most recently updated first
    pub fn list_transfers(&self) -> DbResult<Vec<Transfer>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, manager_instructions, created_at, updated_at
             FROM transfers ORDER BY updated_at DESC, id DESC",
        )?;
        let transfers = stmt
            .query_map([], transfer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transfers)
    }

    // ==================== Interview Operations ====================

    /// Interview state of a transfer; an empty or unreadable blob starts fresh
    pub fn load_interview(&self, id: i64) -> DbResult<InterviewState> {
        let transfer = self.get_transfer(id)?;
        Ok(persistence::load(
            transfer.manager_instructions.as_deref().unwrap_or_default(),
        ))
    }

    /// Replace the interview state of a transfer
    pub fn save_interview(&self, id: i64, state: &InterviewState) -> DbResult<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transfers SET manager_instructions = ?1, updated_at = ?2 WHERE id = ?3",
            params![persistence::save(state), Utc::now().to_rfc3339(), id],
        )?;
        if updated == 0 {
            return Err(DbError::TransferNotFound(id));
        }
        Ok(())
    }
}

fn transfer_from_row(row: &Row<'_>) -> rusqlite::Result<Transfer> {
    Ok(Transfer {
        id: row.get(0)?,
        title: row.get(1)?,
        manager_instructions: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
