//! System profile acquisition.
//!
//! Runs a fixed set of OS commands, parses the interesting parts, and
//! writes a structured JSON profile that `ark ingest` later loads into the
//! knowledge base.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::config::Config;

/// Gather the profile and write it to `config.profile_path`.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    println!("--- Acquiring system profile ---");

    let profile = json!({
        "cpu_info": parse_lscpu(&run_command("lscpu").await),
        "memory_info": parse_free(&run_command("free -h").await),
        "gpu_info": parse_gpus(&run_command("lspci -vnn | grep -i 'vga compatible controller'").await),
        "os_info": run_command("cat /etc/os-release").await,
        "kernel_info": run_command("uname -a").await,
        "disk_info_df": run_command("df -h").await,
        "disk_info_lsblk": run_command("lsblk").await,
    });

    if let Some(parent) = config.profile_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&config.profile_path, serde_json::to_string_pretty(&profile)?).await?;

    println!("Wrote system profile to {}", config.profile_path.display());
    Ok(())
}

/// Run a shell command and return trimmed stdout; failures become an error
/// string so acquisition always produces a profile.
async fn run_command(command: &str) -> String {
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await;

    match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        Ok(out) => format!(
            "Error executing command '{}': {}",
            command,
            String::from_utf8_lossy(&out.stderr).trim()
        ),
        Err(e) => format!("Error executing command '{}': {}", command, e),
    }
}

/// Pick the interesting fields out of `lscpu` key/value output.
fn parse_lscpu(output: &str) -> Value {
    let mut data = std::collections::HashMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            data.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let field = |k: &str| data.get(k).cloned().map(Value::from).unwrap_or(Value::Null);

    json!({
        "architecture": field("Architecture"),
        "cpu_cores": field("CPU(s)"),
        "vendor_id": field("Vendor ID"),
        "model_name": field("Model name"),
        "mhz": field("CPU MHz"),
        "l1d_cache": field("L1d cache"),
        "l1i_cache": field("L1i cache"),
        "l2_cache": field("L2 cache"),
        "l3_cache": field("L3 cache"),
    })
}

/// Parse the header/value table printed by `free -h`.
fn parse_free(output: &str) -> Value {
    let mut lines = output.lines();
    let headers: Vec<&str> = match lines.next() {
        Some(h) => h.split_whitespace().collect(),
        None => return json!({}),
    };
    let values: Vec<&str> = match lines.next() {
        Some(v) => v.split_whitespace().collect(),
        None => return json!({}),
    };

    // The value row starts with a "Mem:" label the header row lacks.
    let values = if values.len() == headers.len() + 1 {
        &values[1..]
    } else {
        &values[..]
    };

    let lookup = |name: &str| {
        headers
            .iter()
            .position(|h| *h == name)
            .and_then(|i| values.get(i))
            .map(|v| Value::from(v.to_string()))
            .unwrap_or(Value::Null)
    };

    json!({
        "total_memory": lookup("total"),
        "used_memory": lookup("used"),
        "free_memory": lookup("free"),
    })
}

fn bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("valid regex"))
}

/// GPU model names from `lspci` lines (the bracketed vendor/device text).
fn parse_gpus(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| bracket_re().captures(line))
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lscpu_fields_are_extracted() {
        let sample = "\
Architecture:        x86_64
CPU(s):              16
Vendor ID:           AuthenticAMD
Model name:          AMD Ryzen 7 5800X 8-Core Processor
L3 cache:            32 MiB";

        let parsed = parse_lscpu(sample);
        assert_eq!(parsed["architecture"], "x86_64");
        assert_eq!(parsed["cpu_cores"], "16");
        assert_eq!(parsed["model_name"], "AMD Ryzen 7 5800X 8-Core Processor");
        assert_eq!(parsed["l3_cache"], "32 MiB");
        assert_eq!(parsed["mhz"], Value::Null);
    }

    #[test]
    fn free_table_is_parsed_with_row_label() {
        let sample = "\
              total        used        free      shared  buff/cache   available
Mem:           31Gi       8.2Gi        12Gi       1.1Gi        10Gi        21Gi
Swap:         8.0Gi          0B       8.0Gi";

        let parsed = parse_free(sample);
        assert_eq!(parsed["total_memory"], "31Gi");
        assert_eq!(parsed["used_memory"], "8.2Gi");
        assert_eq!(parsed["free_memory"], "12Gi");
    }

    #[test]
    fn free_empty_output_is_empty_object() {
        assert_eq!(parse_free(""), json!({}));
    }

    #[test]
    fn gpu_brackets_are_extracted() {
        let sample = "01:00.0 VGA compatible controller [0300]: NVIDIA Corporation GA104 [GeForce RTX 3070]";
        let gpus = parse_gpus(sample);
        assert_eq!(gpus, vec!["0300".to_string()]);
    }

    #[test]
    fn no_gpu_lines_yield_empty() {
        assert!(parse_gpus("").is_empty());
    }
}
