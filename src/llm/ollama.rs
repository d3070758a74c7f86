//! Ollama HTTP client (local model server).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, EmbeddingClient, LlmError};

/// Client for a local Ollama server, covering both completions
/// (`/api/generate`) and embeddings (`/api/embeddings`).
pub struct OllamaClient {
    base_url: String,
    model: String,
    embed_model: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, embed_model: String) -> Self {
        Self {
            base_url,
            model,
            embed_model,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "completion request");

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                // Deterministic output keeps the Thought/Action format stable.
                options: GenerateOptions { temperature: 0.0 },
            })
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::BadResponse(e.to_string()))?;

        Ok(body.response)
    }
}

#[async_trait]
impl EmbeddingClient for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&EmbeddingsRequest {
                model: &self.embed_model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::BadResponse(e.to_string()))?;

        Ok(body.embedding)
    }
}
