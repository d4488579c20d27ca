//! LLM provider abstraction
//!
//! Provides a common interface for the language model used by the remote
//! extractor.

mod config;
mod error;
mod openai;
mod types;

#[cfg(test)]
pub mod testing;

pub use config::LlmConfig;
pub use error::LlmError;
pub use openai::OpenAIService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Build the configured service, wrapped with logging.
///
/// Returns `None` when no credentials are configured; the caller then runs the
/// interview with the deterministic extractor only.
pub fn build_service(config: &LlmConfig) -> Result<Option<Arc<dyn LlmService>>, LlmError> {
    // Gateway mode authenticates on our behalf
    let api_key = match (&config.openai_api_key, &config.gateway) {
        (Some(key), _) if !key.is_empty() => key.clone(),
        (_, Some(_)) => "implicit".to_string(),
        _ => return Ok(None),
    };

    let service = OpenAIService::new(
        api_key,
        config.model.clone(),
        config.base_url.as_deref(),
        config.gateway.as_deref(),
        config.timeout,
    )?;
    Ok(Some(Arc::new(LoggingService::new(Arc::new(service)))))
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
