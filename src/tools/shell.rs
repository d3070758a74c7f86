//! Shell command execution tool.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ArgKind, Tool};

/// Substrings that make a command unconditionally refused. Matching is on
/// the raw command text, before any shell parsing.
const BLOCKED_PATTERNS: &[&str] = &[
    "rm -rf /",
    "mkfs",
    "dd if=/dev/zero of=/dev/sd",
    "dd of=/dev/sd",
    ":(){ :|:& };:",
    "> /dev/sda",
    "chmod -R 777 /",
];

/// Run a shell command with a wall-clock timeout.
pub struct RunCommand {
    timeout_secs: u64,
}

impl RunCommand {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Returns the refusal message for a blocked command, or `None` if the
    /// command may run.
    fn check_blocked(command: &str) -> Option<String> {
        BLOCKED_PATTERNS
            .iter()
            .find(|pattern| command.contains(*pattern))
            .map(|pattern| {
                format!(
                    "Refused to execute: command contains the blocked pattern '{}'. \
                     This command will not be run.",
                    pattern
                )
            })
    }
}

#[async_trait]
impl Tool for RunCommand {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its combined stdout/stderr. Use for system queries and setup commands; destructive commands are refused."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::Command
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let command = input.trim();
        if command.is_empty() {
            return Ok("No command given.".to_string());
        }

        if let Some(refusal) = Self::check_blocked(command) {
            tracing::warn!(command, "blocked destructive command");
            return Ok(refusal);
        }

        tracing::info!("Executing command: {}", command);

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new("sh")
                .arg("-c")
                .arg(command)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await;

        let output = match output {
            Ok(result) => result?,
            Err(_) => {
                return Ok(format!(
                    "Command timed out after {} second(s): {}",
                    self.timeout_secs, command
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut result = String::new();
        result.push_str(stdout.trim_end());
        if !stderr.trim().is_empty() {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(stderr.trim_end());
        }
        if result.is_empty() {
            result.push_str("(no output)");
        }

        if !output.status.success() {
            result.push_str(&format!(
                "\n(exit code: {})",
                output.status.code().unwrap_or(-1)
            ));
        }

        super::truncate_output(&mut result, 10_000, "\n... [output truncated]");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_delete_is_blocked() {
        let refusal = RunCommand::check_blocked("rm -rf / --no-preserve-root");
        assert!(refusal.is_some());
        assert!(refusal.unwrap().contains("Refused"));
    }

    #[test]
    fn glob_root_delete_is_blocked() {
        // "rm -rf /*" contains "rm -rf /" as a prefix.
        assert!(RunCommand::check_blocked("rm -rf /*").is_some());
    }

    #[test]
    fn fork_bomb_is_blocked() {
        assert!(RunCommand::check_blocked(":(){ :|:& };:").is_some());
    }

    #[test]
    fn ordinary_commands_pass() {
        assert!(RunCommand::check_blocked("df -h").is_none());
        assert!(RunCommand::check_blocked("ls ~/Documents").is_none());
    }

    #[test]
    fn matching_is_coarse_substring() {
        // Even a filename containing a pattern is refused.
        assert!(RunCommand::check_blocked("cat notes-about-mkfs.txt").is_some());
    }

    #[tokio::test]
    async fn blocked_command_never_spawns() {
        let tool = RunCommand::new(5);
        let out = tool.execute("rm -rf /").await.unwrap();
        assert!(out.contains("Refused"));
    }

    #[tokio::test]
    async fn combines_streams_and_annotates_exit_code() {
        let tool = RunCommand::new(5);
        let out = tool
            .execute("echo out; echo err 1>&2; exit 3")
            .await
            .unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
        assert!(out.contains("(exit code: 3)"));
    }

    #[tokio::test]
    async fn successful_command_has_no_exit_annotation() {
        let tool = RunCommand::new(5);
        let out = tool.execute("echo hello").await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn long_multibyte_output_truncates_without_panicking() {
        let tool = RunCommand::new(5);
        // One ASCII byte then 5000 two-byte chars: 10,001 bytes total, and
        // byte 10,000 falls inside the last char.
        let out = tool
            .execute("printf x; yes é | head -n 5000 | tr -d '\\n'")
            .await
            .unwrap();
        assert!(out.contains("[output truncated]"));
        assert!(out.len() <= 10_000 + "\n... [output truncated]".len());
    }

    #[tokio::test]
    async fn timeout_returns_observation() {
        let tool = RunCommand::new(1);
        let out = tool.execute("sleep 5").await.unwrap();
        assert!(out.contains("timed out after 1 second(s)"));
    }
}
