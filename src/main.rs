//! Handover interview service
//!
//! Interviews the outgoing holder of a position about their responsibilities
//! and the tasks behind each one, and stores the result with the transfer.

mod api;
mod db;
mod extraction;
mod interview;
mod llm;

use api::{create_router, AppState};
use db::Database;
use extraction::{Extractor, FallbackExtractor, RemoteExtractor};
use interview::Interviewer;
use llm::LlmConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Process-level settings
struct ServerConfig {
    db_path: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let db_path = std::env::var("INTERVIEW_DB_PATH").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            format!("{home}/.handover-interview/interview.db")
        });

        let port = std::env::var("INTERVIEW_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self { db_path, port }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handover_interview=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    // Pick the extractor: a configured model, or the line parser
    let llm_config = LlmConfig::from_env();
    let extractor: Arc<dyn Extractor> = match llm::build_service(&llm_config)? {
        Some(service) => {
            tracing::info!(model = %service.model_id(), "Using remote extraction");
            Arc::new(RemoteExtractor::new(service))
        }
        None => {
            tracing::warn!(
                "No LLM configured. Set OPENAI_API_KEY or LLM_GATEWAY; using fallback parser."
            );
            Arc::new(FallbackExtractor)
        }
    };
    let interviewer = Interviewer::new(extractor);
    tracing::info!(extractor = %interviewer.extractor_name(), "Interviewer ready");

    let state = AppState::new(db, interviewer);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Handover interview server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
