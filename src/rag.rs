//! Retrieval-augmented answering over the knowledge collections.
//!
//! A question is embedded, the nearest documents are pulled from the named
//! collection, and the completion service answers from that context only.
//! A missing collection is not an error: it becomes an `ACTION_REQUIRED`
//! observation carrying the exact commands that would create it, which the
//! agent is prompted to run via the shell tool.

use std::sync::Arc;

use crate::config::{PROJECT_COLLECTION, SYSTEM_COLLECTION};
use crate::llm::{CompletionClient, EmbeddingClient};
use crate::store::{StoreError, VectorStore};

/// Marker prefix that signals "run these commands, then retry".
pub const ACTION_REQUIRED: &str = "ACTION_REQUIRED";

const SYSTEM_TEMPLATE: &str = r#"You are ARK, a helpful AI assistant with access to specific information about this system.
Your task is to answer the user's question based *only* on the context provided below.
If the context does not contain the answer, state that the information is not available in your knowledge base.
Do not make up information. Be concise and accurate, citing the source file if possible.

CONTEXT:
{context}

QUESTION:
{question}

ANSWER:
"#;

const PROJECT_TEMPLATE: &str = r#"You are ARK, a helpful AI assistant with access to a software project's source code and documentation.
Your task is to answer the user's technical question based *only* on the context provided from the project files.
Analyze the code snippets, documentation, and file contents to provide accurate answers.
If the context does not contain the answer, state that the information is not available in the project's knowledge base.
When referencing code, mention the source file from the context.

CONTEXT:
{context}

QUESTION:
{question}

ANSWER:
"#;

/// Retrieval + answer synthesis against one vector store.
pub struct KnowledgeBase {
    llm: Arc<dyn CompletionClient>,
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl KnowledgeBase {
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self {
            llm,
            embedder,
            store,
            top_k,
        }
    }

    /// Answer `question` from `collection`.
    ///
    /// Returns the `ACTION_REQUIRED` remediation string (not an error) when
    /// the collection does not exist yet.
    pub async fn answer(&self, collection: &str, question: &str) -> anyhow::Result<String> {
        let embedding = self.embedder.embed(question).await?;

        let hits = match self.store.query(collection, &embedding, self.top_k).await {
            Ok(hits) => hits,
            Err(StoreError::CollectionNotFound(name)) => {
                return Ok(missing_collection_message(&name));
            }
            Err(e) => return Err(e.into()),
        };

        if hits.is_empty() {
            return Ok(format!(
                "The knowledge base '{}' is empty; no context available.",
                collection
            ));
        }

        let context = hits
            .iter()
            .map(|hit| {
                let source = hit
                    .metadata
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown source");
                format!("--- CONTEXT FROM: {} ---\n{}", source, hit.document)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let template = template_for(collection);
        let prompt = template
            .replace("{context}", &context)
            .replace("{question}", question);

        Ok(self.llm.complete(&prompt).await?)
    }
}

fn template_for(collection: &str) -> &'static str {
    if collection == SYSTEM_COLLECTION {
        SYSTEM_TEMPLATE
    } else {
        PROJECT_TEMPLATE
    }
}

/// Remediation message for an absent collection, with the commands that
/// populate it embedded verbatim.
pub fn missing_collection_message(collection: &str) -> String {
    let remedy = if collection == SYSTEM_COLLECTION {
        "ark acquire && ark ingest".to_string()
    } else if collection == PROJECT_COLLECTION {
        format!(
            "ark ingest --path <project directory> --collection {}",
            PROJECT_COLLECTION
        )
    } else {
        format!("ark ingest --path <directory> --collection {}", collection)
    };

    format!(
        "{}: the knowledge collection '{}' does not exist yet. \
         Run the following command first, then retry the question: {}",
        ACTION_REQUIRED, collection, remedy
    )
}
