//! Language-model service boundary.
//!
//! The agent loop and the RAG pipeline only see the two traits below; the
//! concrete Ollama client lives in [`ollama`]. Tests substitute scripted
//! implementations.

mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion service request failed: {0}")]
    Transport(String),

    #[error("completion service returned an unexpected body: {0}")]
    BadResponse(String),
}

/// Prompt-in, text-out completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Text-in, vector-out embedding service.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}
