//! Chroma REST client.
//!
//! Talks to a Chroma server's v1 HTTP API. Collection names are resolved to
//! ids on every call; this keeps the client stateless at the cost of one
//! extra round-trip, which is irrelevant at this system's scale.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::{DocumentChunk, Metadata, QueryHit, StoreError, VectorStore};

pub struct ChromaStore {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<Vec<String>>,
    metadatas: Vec<Vec<Option<Metadata>>>,
}

#[derive(Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    metadatas: Vec<Option<Metadata>>,
}

impl ChromaStore {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Resolve a collection name to its id; missing collections map to
    /// `StoreError::CollectionNotFound`.
    async fn collection_id(&self, name: &str) -> Result<String, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("collections/{}", name)))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let info: CollectionInfo = response
                    .json()
                    .await
                    .map_err(|e| StoreError::BadResponse(e.to_string()))?;
                Ok(info.id)
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST | StatusCode::INTERNAL_SERVER_ERROR => {
                // Chroma versions differ in the status they use for an
                // unknown collection name.
                Err(StoreError::CollectionNotFound(name.to_string()))
            }
            other => Err(StoreError::Transport(format!(
                "unexpected status {} resolving collection '{}'",
                other, name
            ))),
        }
    }

    /// Resolve a collection id, creating the collection when absent.
    async fn collection_id_or_create(&self, name: &str) -> Result<String, StoreError> {
        let response = self
            .http
            .post(self.url("collections"))
            .json(&json!({ "name": name, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let info: CollectionInfo = response
            .json()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))?;
        Ok(info.id)
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, StoreError> {
        self.http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Transport(e.to_string()))
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        n: usize,
    ) -> Result<Vec<QueryHit>, StoreError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .post_json(
                &format!("collections/{}/query", id),
                json!({
                    "query_embeddings": [embedding],
                    "n_results": n,
                    "include": ["documents", "metadatas"],
                }),
            )
            .await?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))?;

        let documents = body.documents.into_iter().next().unwrap_or_default();
        let metadatas = body.metadatas.into_iter().next().unwrap_or_default();

        Ok(documents
            .into_iter()
            .zip(metadatas.into_iter().chain(std::iter::repeat(None)))
            .map(|(document, metadata)| QueryHit {
                document,
                metadata: metadata.unwrap_or_default(),
            })
            .collect())
    }

    async fn get_metadata(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Metadata>, StoreError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .post_json(
                &format!("collections/{}/get", id),
                json!({ "ids": [doc_id], "include": ["metadatas"] }),
            )
            .await?;

        let body: GetResponse = response
            .json()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))?;

        Ok(body.metadatas.into_iter().next().flatten())
    }

    async fn get_all_metadata(
        &self,
        collection: &str,
    ) -> Result<Vec<(String, Metadata)>, StoreError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .post_json(
                &format!("collections/{}/get", id),
                json!({ "include": ["metadatas"] }),
            )
            .await?;

        let body: GetResponse = response
            .json()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))?;

        Ok(body
            .ids
            .into_iter()
            .zip(body.metadatas.into_iter().chain(std::iter::repeat(None)))
            .map(|(id, metadata)| (id, metadata.unwrap_or_default()))
            .collect())
    }

    async fn add(&self, collection: &str, chunks: &[DocumentChunk]) -> Result<(), StoreError> {
        if chunks.is_empty() {
            return Ok(());
        }
        let id = self.collection_id_or_create(collection).await?;

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let documents: Vec<&str> = chunks.iter().map(|c| c.document.as_str()).collect();
        let embeddings: Vec<&[f32]> = chunks.iter().map(|c| c.embedding.as_slice()).collect();
        let metadatas: Vec<&Metadata> = chunks.iter().map(|c| &c.metadata).collect();

        self.post_json(
            &format!("collections/{}/upsert", id),
            json!({
                "ids": ids,
                "documents": documents,
                "embeddings": embeddings,
                "metadatas": metadatas,
            }),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let id = self.collection_id(collection).await?;
        self.post_json(&format!("collections/{}/delete", id), json!({ "ids": ids }))
            .await?;
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .http
            .get(self.url(&format!("collections/{}/count", id)))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))
    }
}
