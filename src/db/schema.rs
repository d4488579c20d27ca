//! Database schema and types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS transfers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    manager_instructions TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transfers_updated ON transfers(updated_at DESC);
";

/// A job handover whose interview state is kept in `manager_instructions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub title: String,
    /// Serialized interview state; `None` until the first turn is saved
    #[serde(skip_serializing)]
    pub manager_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transfer {
    pub fn has_interview(&self) -> bool {
        self.manager_instructions
            .as_deref()
            .is_some_and(|blob| !blob.trim().is_empty())
    }
}
