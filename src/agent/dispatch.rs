//! Tool dispatch: argument shaping, invocation, and uniform error capture.
//!
//! Dispatch is infallible by contract. Unknown tools and tool failures both
//! come back as observation strings, so the model sees them as input for
//! its next thought instead of the loop crashing.

use crate::paths::normalize_path;
use crate::tools::{ArgKind, ToolRegistry};

/// Prefix distinguishing tool failures from normal output.
const TOOL_ERROR_PREFIX: &str = "Tool error: ";

/// Look up `name`, shape `raw_input` per the tool's argument kind, invoke,
/// and return the observation.
pub async fn dispatch(registry: &ToolRegistry, name: &str, raw_input: &str) -> String {
    let Some(tool) = registry.get(name) else {
        return format!(
            "Unknown tool '{}'. Valid tools: {}",
            name,
            registry.names().join(", ")
        );
    };

    let shaped = match tool.arg_kind() {
        ArgKind::None => String::new(),
        ArgKind::Path => {
            let trimmed = raw_input.trim();
            if trimmed.is_empty() {
                String::new()
            } else {
                normalize_path(trimmed).display().to_string()
            }
        }
        ArgKind::Command | ArgKind::FreeText => raw_input.trim().to_string(),
    };

    tracing::debug!(tool = name, input = %shaped, "dispatching tool");

    match tool.execute(&shaped).await {
        Ok(observation) => observation,
        Err(e) => format!("{}{}", TOOL_ERROR_PREFIX, e),
    }
}
