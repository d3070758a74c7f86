//! Shared service handles.
//!
//! One `AppContext` is built at process start and passed by reference into
//! the agent, the tools, and the ingestion commands. Nothing here is
//! mutable after construction, so handles are plain `Arc`s with no locking.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::{CompletionClient, EmbeddingClient, OllamaClient};
use crate::store::{ChromaStore, VectorStore};

/// Process-wide service handles plus configuration.
pub struct AppContext {
    pub config: Config,
    pub llm: Arc<dyn CompletionClient>,
    pub embedder: Arc<dyn EmbeddingClient>,
    pub store: Arc<dyn VectorStore>,
}

impl AppContext {
    /// Build the real context: Ollama for completions and embeddings,
    /// Chroma for storage.
    pub fn new(config: Config) -> Self {
        let ollama = Arc::new(OllamaClient::new(
            config.ollama_url.clone(),
            config.model.clone(),
            config.embed_model.clone(),
        ));
        let store = Arc::new(ChromaStore::new(config.chroma_url.clone()));

        Self {
            config,
            llm: ollama.clone(),
            embedder: ollama,
            store,
        }
    }

    /// Build a context from explicit handles (used by tests to substitute
    /// fakes).
    pub fn with_services(
        config: Config,
        llm: Arc<dyn CompletionClient>,
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            config,
            llm,
            embedder,
            store,
        }
    }
}
