//! HTTP API
//!
//! Thin JSON layer over the transfer store and the interview controller.
//! Each chat request is one load, one turn and one save.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::interview::Interviewer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub interviewer: Interviewer,
}

impl AppState {
    pub fn new(db: Database, interviewer: Interviewer) -> Self {
        Self { db, interviewer }
    }
}
