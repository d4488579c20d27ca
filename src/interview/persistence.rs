//! State blob encoding
//!
//! The blob is whatever the caller stores next to its subject record. Loading
//! never fails: an absent or unreadable blob starts a fresh interview.

use super::InterviewState;

/// Rehydrate a state from a stored blob
pub fn load(blob: &str) -> InterviewState {
    let blob = blob.trim();
    if blob.is_empty() {
        return InterviewState::new();
    }
    match serde_json::from_str(blob) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable interview state");
            InterviewState::new()
        }
    }
}

/// Render the persisted fields of a state as JSON
pub fn save(state: &InterviewState) -> String {
    serde_json::to_string(state).unwrap_or_else(|e| {
        // String keys and plain values only; this cannot fail in practice
        tracing::error!(error = %e, "Failed to encode interview state");
        String::new()
    })
}
