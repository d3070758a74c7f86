//! Vector-store service boundary.
//!
//! Collections hold documents, their embeddings, and per-document metadata,
//! queryable by nearest-neighbor similarity. A missing collection is a
//! distinguished error so callers can turn it into remediation guidance
//! instead of a failure.

mod chroma;

pub use chroma::ChromaStore;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Flattened per-document metadata (string/number/bool values).
pub type Metadata = HashMap<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection '{0}' does not exist")]
    CollectionNotFound(String),

    #[error("vector store request failed: {0}")]
    Transport(String),

    #[error("vector store returned an unexpected body: {0}")]
    BadResponse(String),
}

/// One similarity-search hit.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub document: String,
    pub metadata: Metadata,
}

/// A document chunk ready for insertion.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
}

/// Persisted embedding index, queryable by similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Nearest `n` documents to `embedding` in `collection`.
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        n: usize,
    ) -> Result<Vec<QueryHit>, StoreError>;

    /// Metadata of a single document by id, if present.
    async fn get_metadata(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Metadata>, StoreError>;

    /// All `(id, metadata)` pairs in a collection.
    async fn get_all_metadata(
        &self,
        collection: &str,
    ) -> Result<Vec<(String, Metadata)>, StoreError>;

    /// Insert chunks, creating the collection if needed. Existing ids are
    /// overwritten.
    async fn add(&self, collection: &str, chunks: &[DocumentChunk]) -> Result<(), StoreError>;

    /// Delete documents by id.
    async fn delete(&self, collection: &str, ids: &[String]) -> Result<(), StoreError>;

    /// Number of documents in a collection.
    async fn count(&self, collection: &str) -> Result<usize, StoreError>;
}
