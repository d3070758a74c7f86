//! Per-question step history.
//!
//! Structured append-only log, rendered to Thought/Action/Observation text
//! only at prompt-construction time so a different rendering policy could
//! be swapped in without touching the loop.

/// One completed loop iteration.
#[derive(Debug, Clone)]
pub struct Step {
    pub thought: String,
    pub action: Option<String>,
    pub action_input: Option<String>,
    pub observation: Option<String>,
}

/// Ordered step log for one question. Discarded when the question resolves.
#[derive(Debug, Default)]
pub struct History {
    steps: Vec<Step>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Render the log back into the marker format the model was prompted
    /// with.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str("Thought: ");
            out.push_str(&step.thought);
            out.push('\n');
            if let Some(action) = &step.action {
                out.push_str("Action: ");
                out.push_str(action);
                out.push('\n');
            }
            if let Some(input) = &step.action_input {
                out.push_str("Action Input: ");
                out.push_str(input);
                out.push('\n');
            }
            if let Some(observation) = &step.observation {
                out.push_str("Observation: ");
                out.push_str(observation);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_steps_in_order() {
        let mut history = History::new();
        history.push(Step {
            thought: "first".to_string(),
            action: Some("list_files".to_string()),
            action_input: Some("desktop".to_string()),
            observation: Some("a.txt".to_string()),
        });
        history.push(Step {
            thought: "second".to_string(),
            action: None,
            action_input: None,
            observation: None,
        });

        let text = history.render();
        assert_eq!(
            text,
            "Thought: first\nAction: list_files\nAction Input: desktop\nObservation: a.txt\nThought: second\n"
        );
    }

    #[test]
    fn empty_history_renders_empty() {
        assert_eq!(History::new().render(), "");
    }
}
