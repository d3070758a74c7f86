//! The ReAct agent: prompt construction, response parsing, tool dispatch,
//! and the control loop that ties them together.

mod agent_loop;
mod dispatch;
mod history;
mod parser;
mod prompt;

pub use agent_loop::{Agent, Outcome, TraceEntry, TraceKind, EXHAUSTED_MESSAGE};
pub use dispatch::dispatch;
pub use history::{History, Step};
pub use parser::{parse_response, ParsedResponse};
pub use prompt::{build_prompt, canned_reply};
