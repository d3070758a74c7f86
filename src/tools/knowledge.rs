//! Knowledge-base query tools (RAG).

use std::sync::Arc;

use async_trait::async_trait;

use crate::rag::KnowledgeBase;

use super::{ArgKind, Tool};

/// Answer a free-text question from one knowledge collection.
///
/// One instance is registered per collection; they differ only in name,
/// description, and target collection.
pub struct KnowledgeQuery {
    name: &'static str,
    description: &'static str,
    collection: &'static str,
    kb: Arc<KnowledgeBase>,
}

impl KnowledgeQuery {
    pub fn new(
        name: &'static str,
        description: &'static str,
        collection: &'static str,
        kb: Arc<KnowledgeBase>,
    ) -> Self {
        Self {
            name,
            description,
            collection,
            kb,
        }
    }
}

#[async_trait]
impl Tool for KnowledgeQuery {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::FreeText
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        if input.trim().is_empty() {
            return Ok("No question given.".to_string());
        }
        self.kb.answer(self.collection, input).await
    }
}
