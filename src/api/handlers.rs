//! HTTP request handlers

use super::types::{
    ChatMessageRequest, ChatResponse, CreateTransferRequest, ErrorResponse, HealthResponse,
    TransferListResponse, TransferResponse, TransferWithInterviewResponse,
};
use super::AppState;
use crate::db::DbError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Transfers
        .route("/api/transfers", get(list_transfers).post(create_transfer))
        .route("/api/transfers/:id", get(get_transfer))
        // Interview turns
        .route("/api/transfers/:id/chat/start", post(start_interview))
        .route("/api/transfers/:id/chat/message", post(send_message))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============================================================
// Transfers
// ============================================================

async fn list_transfers(
    State(state): State<AppState>,
) -> Result<Json<TransferListResponse>, AppError> {
    let transfers = state.db.list_transfers()?;
    Ok(Json(TransferListResponse { transfers }))
}

async fn create_transfer(
    State(state): State<AppState>,
    Json(req): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }

    let transfer = state.db.create_transfer(title)?;
    tracing::info!(transfer_id = transfer.id, "Transfer created");
    Ok((StatusCode::CREATED, Json(TransferResponse { transfer })))
}

async fn get_transfer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TransferWithInterviewResponse>, AppError> {
    let transfer = state.db.get_transfer(id)?;
    let interview = state.db.load_interview(id)?;
    Ok(Json(TransferWithInterviewResponse {
        started: transfer.has_interview(),
        transfer,
        ready: interview.is_ready(),
        interview,
    }))
}

// ============================================================
// Interview
// ============================================================

async fn start_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ChatResponse>, AppError> {
    let interview = state.db.load_interview(id)?;
    let result = state.interviewer.begin(&interview);
    state.db.save_interview(id, &result.new_state)?;

    tracing::info!(transfer_id = id, "Interview started");
    Ok(Json(result.into()))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let interview = state.db.load_interview(id)?;
    let result = state.interviewer.advance(&interview, &req.message).await;
    state.db.save_interview(id, &result.new_state)?;

    tracing::info!(
        transfer_id = id,
        step = %result.new_state.step(),
        "Interview answer processed"
    );
    Ok(Json(result.into()))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::TransferNotFound(_) => AppError::NotFound(e.to_string()),
            _ => {
                tracing::error!(error = %e, "Store operation failed");
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
