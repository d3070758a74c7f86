//! System introspection tools: stored spec lookup plus live disk, memory,
//! and CPU snapshots.

use std::sync::Arc;

use async_trait::async_trait;
use sysinfo::{Disks, System};

use crate::config::{SYSTEM_COLLECTION, SYSTEM_PROFILE_DOC_ID};
use crate::rag::missing_collection_message;
use crate::store::{StoreError, VectorStore};

use super::{ArgKind, Tool};

/// Look up fields of the ingested system profile.
pub struct SystemSpec {
    store: Arc<dyn VectorStore>,
}

impl SystemSpec {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SystemSpec {
    fn name(&self) -> &str {
        "get_system_spec"
    }

    fn description(&self) -> &str {
        "Get stored system specifications. Input is a comma-separated list of field names (e.g. cpu_model, cpu_cores, total_memory, gpu_models); empty input returns CPU info."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::FreeText
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let metadata = match self
            .store
            .get_metadata(SYSTEM_COLLECTION, SYSTEM_PROFILE_DOC_ID)
            .await
        {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                return Ok(missing_collection_message(SYSTEM_COLLECTION));
            }
            Err(StoreError::CollectionNotFound(name)) => {
                return Ok(missing_collection_message(&name));
            }
            Err(e) => return Err(e.into()),
        };

        let fields: Vec<&str> = if input.trim().is_empty() {
            vec!["cpu_model", "cpu_cores"]
        } else {
            input.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
        };

        let lines: Vec<String> = fields
            .iter()
            .map(|field| {
                let value = metadata
                    .get(*field)
                    .map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    })
                    .unwrap_or_else(|| "Not available".to_string());
                format!("{}: {}", field, value)
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Live disk usage per mounted filesystem.
pub struct DiskUsage;

#[async_trait]
impl Tool for DiskUsage {
    fn name(&self) -> &str {
        "get_disk_usage"
    }

    fn description(&self) -> &str {
        "Get disk usage for all mounted filesystems. Takes no input."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::None
    }

    async fn execute(&self, _input: &str) -> anyhow::Result<String> {
        let disks = Disks::new_with_refreshed_list();
        if disks.list().is_empty() {
            return Ok("No disks found.".to_string());
        }

        let lines: Vec<String> = disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let available = disk.available_space();
                let used = total.saturating_sub(available);
                let pct = if total > 0 {
                    (used as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                format!(
                    "{}: {} used of {} ({:.0}% full, {} available)",
                    disk.mount_point().display(),
                    format_bytes(used),
                    format_bytes(total),
                    pct,
                    format_bytes(available),
                )
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Live RAM and swap totals.
pub struct MemoryUsage;

#[async_trait]
impl Tool for MemoryUsage {
    fn name(&self) -> &str {
        "get_memory_usage"
    }

    fn description(&self) -> &str {
        "Get current RAM and swap usage. Takes no input."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::None
    }

    async fn execute(&self, _input: &str) -> anyhow::Result<String> {
        let mut sys = System::new();
        sys.refresh_memory();

        Ok(format!(
            "RAM: {} used of {} ({} available)\nSwap: {} used of {}",
            format_bytes(sys.used_memory()),
            format_bytes(sys.total_memory()),
            format_bytes(sys.available_memory()),
            format_bytes(sys.used_swap()),
            format_bytes(sys.total_swap()),
        ))
    }
}

/// CPU load snapshot.
pub struct CpuUsage;

#[async_trait]
impl Tool for CpuUsage {
    fn name(&self) -> &str {
        "get_cpu_usage"
    }

    fn description(&self) -> &str {
        "Get a CPU load snapshot, per core and averaged. Takes no input."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::None
    }

    async fn execute(&self, _input: &str) -> anyhow::Result<String> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        // Usage is a delta; a second refresh after the minimum interval is
        // required for a meaningful reading.
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu_usage();

        let per_core: Vec<String> = sys
            .cpus()
            .iter()
            .enumerate()
            .map(|(i, cpu)| format!("core {}: {:.1}%", i, cpu.cpu_usage()))
            .collect();

        Ok(format!(
            "Average CPU usage: {:.1}%\n{}",
            sys.global_cpu_usage(),
            per_core.join("\n")
        ))
    }
}

/// Human-readable byte count.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }

    #[tokio::test]
    async fn memory_usage_reports_totals() {
        let out = MemoryUsage.execute("").await.unwrap();
        assert!(out.contains("RAM:"));
        assert!(out.contains("Swap:"));
    }
}
