pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a model call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Single request/response seam to the language model, consumed by the
/// decomposer and by the model-backed capability adapters. Constructed
/// once and passed in explicitly so tests can substitute a stub.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn interpret(&self, prompt: &str) -> Result<String, ModelError>;
}
