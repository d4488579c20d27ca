//! API request and response types

use crate::db::Transfer;
use crate::interview::{InterviewState, Step, TurnResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to create a new transfer
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub title: String,
}

/// Request to send one interview answer
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
}

/// Response with a list of transfers
#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub transfers: Vec<Transfer>,
}

/// Response with a single transfer
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub transfer: Transfer,
}

/// Response with a transfer and its interview so far
#[derive(Debug, Serialize)]
pub struct TransferWithInterviewResponse {
    pub transfer: Transfer,
    pub interview: InterviewState,
    /// An interview has been saved for this transfer
    pub started: bool,
    /// Every responsibility has at least one task
    pub ready: bool,
}

/// Outcome of one interview turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub assistant: String,
    pub pending_step: Step,
    pub responsibilities: Vec<String>,
    pub tasks: BTreeMap<String, Vec<String>>,
    pub state: InterviewState,
}

impl From<TurnResult> for ChatResponse {
    fn from(result: TurnResult) -> Self {
        let state = result.new_state;
        Self {
            assistant: result.reply,
            pending_step: state.step(),
            responsibilities: state.responsibilities().to_vec(),
            tasks: state.tasks().clone(),
            state,
        }
    }
}

/// Liveness probe
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
