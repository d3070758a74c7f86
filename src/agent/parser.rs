//! Parser for the model's semi-structured Thought/Action/Final Answer text.
//!
//! The upstream generator is not contractually structured, so parsing is
//! permissive by design: every input maps to one of the three variants and
//! parsing never fails.

use std::sync::OnceLock;

use regex::Regex;

/// Structured view of one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The model wants a tool invoked.
    Action {
        thought: String,
        name: String,
        input: String,
    },
    /// The model produced its final answer.
    Final { thought: String, answer: String },
    /// Neither pattern matched; `raw` is the whole trimmed text.
    Unparseable {
        thought: Option<String>,
        raw: String,
    },
}

fn thought_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Thought:\s*(.*?)\s*(?:Action:|Final Answer:|$)").expect("valid regex")
    })
}

fn action_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Action:\s*([A-Za-z0-9_\-]+)").expect("valid regex"))
}

fn input_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Rest of the line only: later lines are never part of the input, which
    // keeps multi-line payloads out of this path.
    RE.get_or_init(|| Regex::new(r"Action Input:[ \t]*([^\r\n]*)").expect("valid regex"))
}

fn final_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)Final Answer:\s*(.*)").expect("valid regex"))
}

/// Parse one raw completion into a [`ParsedResponse`].
///
/// Priority order: an `Action:` with a tool-name token wins over a
/// `Final Answer:`; if neither is present the whole trimmed text is the
/// fallback.
pub fn parse_response(text: &str) -> ParsedResponse {
    let thought = thought_re()
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(action) = action_re().captures(text) {
        let name = action[1].to_string();
        let input = input_re()
            .captures(text)
            .map(|c| strip_wrapping(c[1].trim()))
            .unwrap_or_default();
        return ParsedResponse::Action {
            thought: thought.unwrap_or_default(),
            name,
            input,
        };
    }

    if let Some(answer) = final_re().captures(text) {
        return ParsedResponse::Final {
            thought: thought.unwrap_or_default(),
            answer: answer[1].trim().to_string(),
        };
    }

    ParsedResponse::Unparseable {
        thought,
        raw: text.trim().to_string(),
    }
}

/// Strip quote and bracket characters the model tends to wrap inputs in.
fn strip_wrapping(input: &str) -> String {
    input
        .trim_matches(|c| matches!(c, '"' | '\'' | '[' | ']'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_with_input_on_one_line() {
        let parsed = parse_response(
            "Thought: need to look\nAction: list_files\nAction Input: desktop\n",
        );
        assert_eq!(
            parsed,
            ParsedResponse::Action {
                thought: "need to look".to_string(),
                name: "list_files".to_string(),
                input: "desktop".to_string(),
            }
        );
    }

    #[test]
    fn input_quotes_and_brackets_are_stripped() {
        for raw in ["\"desktop\"", "'desktop'", "[desktop]", "[\"desktop\"]"] {
            let text = format!("Action: list_files\nAction Input: {}", raw);
            match parse_response(&text) {
                ParsedResponse::Action { input, .. } => assert_eq!(input, "desktop"),
                other => panic!("expected Action, got {:?}", other),
            }
        }
    }

    #[test]
    fn input_is_truncated_to_one_line() {
        let parsed = parse_response(
            "Action: run_command\nAction Input: echo hi\nrm -rf / # smuggled second line",
        );
        match parsed {
            ParsedResponse::Action { input, .. } => assert_eq!(input, "echo hi"),
            other => panic!("expected Action, got {:?}", other),
        }
    }

    #[test]
    fn empty_action_input() {
        let parsed = parse_response("Thought: checking\nAction: get_disk_usage\nAction Input: \n");
        assert_eq!(
            parsed,
            ParsedResponse::Action {
                thought: "checking".to_string(),
                name: "get_disk_usage".to_string(),
                input: String::new(),
            }
        );
    }

    #[test]
    fn final_answer_keeps_embedded_newlines() {
        let parsed = parse_response("Thought: done\nFinal Answer: line one\nline two\n");
        assert_eq!(
            parsed,
            ParsedResponse::Final {
                thought: "done".to_string(),
                answer: "line one\nline two".to_string(),
            }
        );
    }

    #[test]
    fn action_wins_over_final_answer() {
        let parsed =
            parse_response("Action: get_disk_usage\nAction Input:\nFinal Answer: ignored");
        assert!(matches!(parsed, ParsedResponse::Action { ref name, .. } if name == "get_disk_usage"));
    }

    #[test]
    fn bare_text_is_unparseable_with_full_fallback() {
        let parsed = parse_response("  I am not sure what to do here.  ");
        assert_eq!(
            parsed,
            ParsedResponse::Unparseable {
                thought: None,
                raw: "I am not sure what to do here.".to_string(),
            }
        );
    }

    #[test]
    fn thought_without_action_or_answer() {
        let parsed = parse_response("Thought: the user wants the weather, I have no tool for it");
        match parsed {
            ParsedResponse::Unparseable { thought, .. } => {
                assert_eq!(
                    thought.as_deref(),
                    Some("the user wants the weather, I have no tool for it")
                );
            }
            other => panic!("expected Unparseable, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_never_panics() {
        let parsed = parse_response("");
        assert_eq!(
            parsed,
            ParsedResponse::Unparseable {
                thought: None,
                raw: String::new(),
            }
        );
    }

    #[test]
    fn scenario_disk_is_forty_percent_full() {
        let parsed = parse_response("Thought: done\nFinal Answer: The disk is 40% full.");
        assert_eq!(
            parsed,
            ParsedResponse::Final {
                thought: "done".to_string(),
                answer: "The disk is 40% full.".to_string(),
            }
        );
    }
}
