//! Agent tools.
//!
//! Each tool is a named, described capability the model can invoke by
//! emitting an `Action:` line. The registry is built once at startup from
//! the [`AppContext`](crate::context::AppContext) and never changes
//! afterwards.

mod fs;
mod knowledge;
mod process;
mod project;
mod shell;
mod system;

pub use fs::{CreateFile, ListFiles, ReadFileContent};
pub use knowledge::KnowledgeQuery;
pub use process::ListRunningProcesses;
pub use project::CreateKicadProject;
pub use shell::RunCommand;
pub use system::{CpuUsage, DiskUsage, MemoryUsage, SystemSpec};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{PROJECT_COLLECTION, SYSTEM_COLLECTION};
use crate::context::AppContext;
use crate::rag::KnowledgeBase;

/// How the dispatcher shapes a tool's raw input string before invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Input is ignored.
    None,
    /// Input is a path; normalized through the alias table first.
    Path,
    /// Input is a shell command; passed through unmodified (the tool does
    /// its own safety filtering).
    Command,
    /// Input is free text; passed through unmodified.
    FreeText,
}

/// A capability the agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique registry key, also the token the model emits after `Action:`.
    fn name(&self) -> &str;

    /// One-line description shown to the model in the prompt.
    fn description(&self) -> &str;

    /// Argument shape, resolved once at dispatch time.
    fn arg_kind(&self) -> ArgKind;

    /// Run the tool. Errors are converted to observation strings by the
    /// dispatcher, never propagated further.
    async fn execute(&self, input: &str) -> anyhow::Result<String>;
}

/// Fixed name→tool mapping, immutable after construction.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// The standard tool set, wired to the context's service handles.
    pub fn standard(ctx: &AppContext) -> Self {
        let kb = Arc::new(KnowledgeBase::new(
            ctx.llm.clone(),
            ctx.embedder.clone(),
            ctx.store.clone(),
            ctx.config.retrieval_top_k,
        ));

        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(SystemSpec::new(ctx.store.clone())),
            Arc::new(DiskUsage),
            Arc::new(MemoryUsage),
            Arc::new(CpuUsage),
            Arc::new(ListFiles),
            Arc::new(ReadFileContent),
            Arc::new(CreateFile),
            Arc::new(CreateKicadProject::new()),
            Arc::new(ListRunningProcesses),
            Arc::new(RunCommand::new(ctx.config.command_timeout_secs)),
            Arc::new(KnowledgeQuery::new(
                "query_system_knowledge",
                "Answer a free-text question about this machine's hardware and OS from the stored system knowledge base.",
                SYSTEM_COLLECTION,
                kb.clone(),
            )),
            Arc::new(KnowledgeQuery::new(
                "query_project_knowledge",
                "Answer a free-text question about the ingested project's source code and documentation.",
                PROJECT_COLLECTION,
                kb,
            )),
        ];

        Self { tools }
    }

    /// Build a registry from an explicit tool list (used by tests).
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// `- **name**: description` lines for the prompt.
    pub fn descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- **{}**: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Truncate `s` to at most `max` bytes and append `marker`, backing the cut
/// point up to a char boundary so multi-byte text never panics.
pub(crate) fn truncate_output(s: &mut String, max: usize, marker: &str) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s.push_str(marker);
}
