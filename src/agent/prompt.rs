//! Prompt construction and the pre-loop canned-capability check.

use crate::tools::ToolRegistry;

use super::history::History;

/// Meta-questions answered without spending a model round-trip.
const CANNED_TRIGGERS: &[&str] = &["what can you do", "who are you", "what are you"];

/// Return the canned capability description when `question` is a
/// meta-question about the assistant itself; `None` otherwise.
pub fn canned_reply(question: &str, tools: &ToolRegistry) -> Option<String> {
    let lower = question.trim().to_lowercase();
    if !CANNED_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return None;
    }

    Some(format!(
        "I am ARK, a local assistant for this machine. I can inspect the system \
         (disk, memory, CPU, processes), read and list files, run shell commands, \
         and answer questions from my knowledge base.\n\nMy tools:\n{}",
        tools.descriptions()
    ))
}

/// Build the full prompt for one loop iteration.
pub fn build_prompt(tools: &ToolRegistry, history: &History, question: &str) -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let history_block = if history.is_empty() {
        String::new()
    } else {
        format!("\nPrevious steps:\n{}", history.render())
    };

    format!(
        r#"You are ARK, an AI assistant for this machine. The current user is {user} and the current directory is {cwd}.

You have access to the following tools:
{tool_descriptions}

Answer the user's question by reasoning step by step. Use EXACTLY this format:

Thought: <what you are thinking>
Action: <one tool name from the list above>
Action Input: <the input for the tool, on this same line>

After each action you will be given an Observation. When you know the answer, reply:

Thought: <final reasoning>
Final Answer: <your answer to the user>

Guidance:
- Emit one action at a time and wait for its observation.
- If a path operation fails, list the parent directory first to find the right name, then retry.
- If an observation starts with ACTION_REQUIRED, run the commands it contains with run_command, then retry the original goal.
{history_block}
Question: {question}"#,
        user = user,
        cwd = cwd,
        tool_descriptions = tools.descriptions(),
        history_block = history_block,
        question = question,
    )
}
