//! Process listing tool.

use async_trait::async_trait;
use sysinfo::{ProcessRefreshKind, RefreshKind, System};

use super::{ArgKind, Tool};

const MAX_LISTED: usize = 100;

/// List running processes, optionally filtered by name.
pub struct ListRunningProcesses;

#[async_trait]
impl Tool for ListRunningProcesses {
    fn name(&self) -> &str {
        "list_running_processes"
    }

    fn description(&self) -> &str {
        "List running processes (pid, name, memory). Input is an optional case-insensitive name filter; empty input lists everything."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::FreeText
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let sys = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::everything()),
        );

        let filter = input.trim().to_lowercase();

        let mut rows: Vec<(u32, String, u64)> = sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                (
                    pid.as_u32(),
                    process.name().to_string_lossy().into_owned(),
                    process.memory(),
                )
            })
            .filter(|(_, name, _)| filter.is_empty() || name.to_lowercase().contains(&filter))
            .collect();

        if rows.is_empty() {
            return Ok(if filter.is_empty() {
                "No processes found.".to_string()
            } else {
                format!("No processes matching '{}'.", filter)
            });
        }

        // Largest consumers first.
        rows.sort_by(|a, b| b.2.cmp(&a.2));
        let total = rows.len();
        rows.truncate(MAX_LISTED);

        let mut lines: Vec<String> = rows
            .into_iter()
            .map(|(pid, name, memory)| format!("{:>8}  {:<30} {} KiB", pid, name, memory / 1024))
            .collect();

        if total > MAX_LISTED {
            lines.push(format!("... ({} of {} shown)", MAX_LISTED, total));
        }

        Ok(lines.join("\n"))
    }
}
