//! Core agent loop implementation.

use std::sync::Arc;

use crate::context::AppContext;
use crate::llm::{CompletionClient, LlmError};
use crate::tools::ToolRegistry;

use super::dispatch::dispatch;
use super::history::{History, Step};
use super::parser::{parse_response, ParsedResponse};
use super::prompt::{build_prompt, canned_reply};

/// Fixed message returned when the iteration cap is hit.
pub const EXHAUSTED_MESSAGE: &str =
    "I could not complete the request within the iteration limit. Try a more specific question.";

/// How one question resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model produced a final answer; `raw` is the unparsed model
    /// output kept for diagnostics.
    Done { answer: String, raw: String },
    /// The reply matched no pattern; the thought (or raw text) is returned
    /// as a best-effort answer rather than retried.
    BestEffort { answer: String },
    /// The iteration cap was reached.
    Exhausted,
}

impl Outcome {
    /// User-facing answer text.
    pub fn text(&self) -> &str {
        match self {
            Outcome::Done { answer, .. } => answer,
            Outcome::BestEffort { answer } => answer,
            Outcome::Exhausted => EXHAUSTED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    ModelOutput,
    ToolCall,
    ToolResult,
}

/// One diagnostic record from a loop run; printed by the REPL in verbose
/// mode.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub kind: TraceKind,
    pub content: String,
}

/// The ReAct agent.
pub struct Agent {
    llm: Arc<dyn CompletionClient>,
    tools: ToolRegistry,
    max_iterations: usize,
}

impl Agent {
    /// Build the agent with the standard tool set from the context.
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            llm: ctx.llm.clone(),
            tools: ToolRegistry::standard(ctx),
            max_iterations: ctx.config.max_iterations,
        }
    }

    /// Build from explicit parts (used by tests to substitute fakes).
    pub fn with_parts(
        llm: Arc<dyn CompletionClient>,
        tools: ToolRegistry,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            max_iterations,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Resolve one question, returning the outcome and the execution trace.
    ///
    /// A transport failure from the completion service is fatal for the
    /// question (no retry); everything else resolves to an `Outcome`.
    pub async fn answer(&self, question: &str) -> Result<(Outcome, Vec<TraceEntry>), LlmError> {
        // Meta-questions skip the model entirely.
        if let Some(reply) = canned_reply(question, &self.tools) {
            return Ok((
                Outcome::Done {
                    answer: reply.clone(),
                    raw: reply,
                },
                Vec::new(),
            ));
        }

        let mut history = History::new();
        let mut trace = Vec::new();
        let mut iterations = 0usize;

        loop {
            if iterations >= self.max_iterations {
                tracing::warn!(iterations, "iteration cap reached");
                return Ok((Outcome::Exhausted, trace));
            }

            let prompt = build_prompt(&self.tools, &history, question);
            tracing::debug!(iteration = iterations + 1, "calling completion service");

            let raw = self.llm.complete(&prompt).await?;
            trace.push(TraceEntry {
                kind: TraceKind::ModelOutput,
                content: raw.clone(),
            });

            match parse_response(&raw) {
                ParsedResponse::Final { answer, .. } => {
                    return Ok((Outcome::Done { answer, raw }, trace));
                }
                ParsedResponse::Action {
                    thought,
                    name,
                    input,
                } => {
                    trace.push(TraceEntry {
                        kind: TraceKind::ToolCall,
                        content: format!("{}({})", name, input),
                    });

                    let observation = dispatch(&self.tools, &name, &input).await;

                    trace.push(TraceEntry {
                        kind: TraceKind::ToolResult,
                        content: observation.clone(),
                    });

                    history.push(Step {
                        thought,
                        action: Some(name),
                        action_input: Some(input),
                        observation: Some(observation),
                    });
                    iterations += 1;
                }
                ParsedResponse::Unparseable { thought, raw } => {
                    // Deliberate short-circuit: forward progress over
                    // fidelity.
                    let answer = thought.unwrap_or(raw);
                    return Ok((Outcome::BestEffort { answer }, trace));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ArgKind, Tool};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Completion fake that replays a fixed script and records prompts.
    struct ScriptedLlm {
        script: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            let mut script: Vec<String> = responses.iter().map(|s| s.to_string()).collect();
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.script
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LlmError::Transport("script exhausted".to_string()))
        }
    }

    struct EchoDisk;

    #[async_trait]
    impl Tool for EchoDisk {
        fn name(&self) -> &str {
            "get_disk_usage"
        }
        fn description(&self) -> &str {
            "disk usage"
        }
        fn arg_kind(&self) -> ArgKind {
            ArgKind::None
        }
        async fn execute(&self, _input: &str) -> anyhow::Result<String> {
            Ok("/ is 40% full".to_string())
        }
    }

    fn disk_registry() -> ToolRegistry {
        ToolRegistry::from_tools(vec![Arc::new(EchoDisk) as Arc<dyn Tool>])
    }

    #[tokio::test]
    async fn final_answer_terminates_done() {
        let llm = ScriptedLlm::new(&["Thought: done\nFinal Answer: The disk is 40% full."]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, _trace) = agent.answer("how full is my disk?").await.unwrap();
        assert_eq!(outcome.text(), "The disk is 40% full.");
        assert!(matches!(outcome, Outcome::Done { .. }));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn action_observation_feeds_next_prompt() {
        let llm = ScriptedLlm::new(&[
            "Thought: checking\nAction: get_disk_usage\nAction Input: \n",
            "Thought: done\nFinal Answer: The disk is 40% full.",
        ]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, trace) = agent.answer("how full is my disk?").await.unwrap();
        assert_eq!(outcome.text(), "The disk is 40% full.");
        assert_eq!(llm.calls(), 2);

        // The second prompt carries the observation verbatim.
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[1].contains("Observation: / is 40% full"));

        // Trace: model output, tool call, tool result, model output.
        assert_eq!(trace.len(), 4);
        assert_eq!(trace[1].kind, TraceKind::ToolCall);
        assert_eq!(trace[2].content, "/ is 40% full");
    }

    #[tokio::test]
    async fn iteration_cap_bounds_model_calls() {
        let always_act = "Thought: again\nAction: get_disk_usage\nAction Input: \n";
        let llm = ScriptedLlm::new(&[always_act; 10]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, _trace) = agent.answer("loop forever").await.unwrap();
        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(outcome.text(), EXHAUSTED_MESSAGE);
        assert_eq!(llm.calls(), 5);
    }

    #[tokio::test]
    async fn unparseable_short_circuits_with_thought() {
        let llm = ScriptedLlm::new(&["Thought: I cannot answer this with my tools"]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, _trace) = agent.answer("mystery").await.unwrap();
        assert_eq!(
            outcome,
            Outcome::BestEffort {
                answer: "I cannot answer this with my tools".to_string()
            }
        );
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn unparseable_without_thought_returns_raw() {
        let llm = ScriptedLlm::new(&["42, probably."]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, _trace) = agent.answer("mystery").await.unwrap();
        assert_eq!(outcome.text(), "42, probably.");
    }

    #[tokio::test]
    async fn canned_question_makes_zero_model_calls() {
        let llm = ScriptedLlm::new(&[]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, trace) = agent.answer("what can you do?").await.unwrap();
        assert!(outcome.text().contains("get_disk_usage"));
        assert!(trace.is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_tool_keeps_loop_alive() {
        let llm = ScriptedLlm::new(&[
            "Thought: try\nAction: no_such_tool\nAction Input: x\n",
            "Thought: done\nFinal Answer: gave up on that tool.",
        ]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let (outcome, _trace) = agent.answer("q").await.unwrap();
        assert_eq!(outcome.text(), "gave up on that tool.");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[1].contains("Unknown tool 'no_such_tool'"));
        assert!(prompts[1].contains("get_disk_usage"));
    }

    #[tokio::test]
    async fn transport_failure_is_fatal_for_question() {
        let llm = ScriptedLlm::new(&[]);
        let agent = Agent::with_parts(llm.clone(), disk_registry(), 5);

        let result = agent.answer("anything").await;
        assert!(result.is_err());
    }
}
