//! Configuration management for ARK.
//!
//! Configuration can be set via environment variables:
//! - `OLLAMA_URL` - Optional. Base URL of the Ollama server. Defaults to `http://127.0.0.1:11434`.
//! - `CHROMA_URL` - Optional. Base URL of the Chroma server. Defaults to `http://127.0.0.1:8000`.
//! - `ARK_MODEL` - Optional. Completion model name. Defaults to `mistral`.
//! - `ARK_EMBED_MODEL` - Optional. Embedding model name. Defaults to `nomic-embed-text`.
//! - `ARK_MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `5`.
//! - `ARK_COMMAND_TIMEOUT_SECS` - Optional. Shell tool timeout. Defaults to `30`.
//! - `ARK_RETRIEVAL_TOP_K` - Optional. Documents retrieved per knowledge query. Defaults to `10`.
//! - `ARK_PROFILE_PATH` - Optional. Where the acquired system profile is written.

use std::path::PathBuf;
use thiserror::Error;

/// Collection holding the ingested system profile.
pub const SYSTEM_COLLECTION: &str = "ark_system_knowledge";

/// Collection holding ingested project documents.
pub const PROJECT_COLLECTION: &str = "ark_project_knowledge";

/// Fixed id of the system profile document inside [`SYSTEM_COLLECTION`].
pub const SYSTEM_PROFILE_DOC_ID: &str = "system_profile_doc_01";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama server (completions and embeddings)
    pub ollama_url: String,

    /// Base URL of the Chroma vector store
    pub chroma_url: String,

    /// Completion model name
    pub model: String,

    /// Embedding model name
    pub embed_model: String,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Wall-clock timeout for the shell command tool, in seconds
    pub command_timeout_secs: u64,

    /// Number of nearest documents retrieved per knowledge query
    pub retrieval_top_k: usize,

    /// Path where the acquired system profile JSON lives
    pub profile_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; the only failure mode is a malformed
    /// numeric value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let ollama_url = std::env::var("OLLAMA_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());

        let chroma_url = std::env::var("CHROMA_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

        let model = std::env::var("ARK_MODEL").unwrap_or_else(|_| "mistral".to_string());

        let embed_model =
            std::env::var("ARK_EMBED_MODEL").unwrap_or_else(|_| "nomic-embed-text".to_string());

        let max_iterations = parse_env("ARK_MAX_ITERATIONS", 5)?;
        let command_timeout_secs = parse_env("ARK_COMMAND_TIMEOUT_SECS", 30)?;
        let retrieval_top_k = parse_env("ARK_RETRIEVAL_TOP_K", 10)?;

        let profile_path = std::env::var("ARK_PROFILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/system_profile/system_profile.json"));

        Ok(Self {
            ollama_url,
            chroma_url,
            model,
            embed_model,
            max_iterations,
            command_timeout_secs,
            retrieval_top_k,
            profile_path,
        })
    }
}

impl Default for Config {
    /// Defaults matching `from_env` with an empty environment (useful for
    /// testing).
    fn default() -> Self {
        Self {
            ollama_url: "http://127.0.0.1:11434".to_string(),
            chroma_url: "http://127.0.0.1:8000".to_string(),
            model: "mistral".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            max_iterations: 5,
            command_timeout_secs: 30,
            retrieval_top_k: 10,
            profile_path: PathBuf::from("data/system_profile/system_profile.json"),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.command_timeout_secs, 30);
        assert_eq!(config.retrieval_top_k, 10);
        assert_eq!(config.model, "mistral");
    }
}
