//! KiCad project scaffolding tool.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{ArgKind, Tool};

/// Create a KiCad project skeleton with an optional component list.
///
/// Input is `<project name>`, optionally followed by `: <comma-separated
/// components>`. Projects land under a fixed base directory.
pub struct CreateKicadProject {
    base: PathBuf,
}

impl CreateKicadProject {
    pub fn new() -> Self {
        Self {
            base: PathBuf::from("projects"),
        }
    }

    #[cfg(test)]
    fn with_base(base: PathBuf) -> Self {
        Self { base }
    }
}

impl Default for CreateKicadProject {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CreateKicadProject {
    fn name(&self) -> &str {
        "create_kicad_project"
    }

    fn description(&self) -> &str {
        "Create a KiCad project skeleton under the 'projects' directory. Input is the project name, optionally followed by ': resistor, capacitor, ...' to seed schematic components."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::FreeText
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let (name, component_list) = match input.split_once(':') {
            Some((name, rest)) => (name.trim(), rest),
            None => (input.trim(), ""),
        };

        if name.is_empty() {
            anyhow::bail!("no project name given");
        }
        if name.contains(['/', '\\']) {
            anyhow::bail!("project name must not contain path separators: {}", name);
        }

        let components: Vec<&str> = component_list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        let project_dir = self.base.join(name);
        tokio::fs::create_dir_all(&project_dir).await?;

        tokio::fs::write(
            project_dir.join(format!("{}.pro", name)),
            "(kicad_project)\n",
        )
        .await?;

        let mut schematic = String::from("EESchema Schematic File Version 4\n");
        schematic.push_str("LIBS:power,device,conn,linear,regul,switch,transf\n");
        for (i, component) in components.iter().enumerate() {
            schematic.push_str(&format!(
                "F {} \"{}\" H 2000 2000 50  0001 C CNN\n",
                i + 1,
                component
            ));
            schematic.push_str("P 2000 2000\n");
        }
        tokio::fs::write(project_dir.join(format!("{}.sch", name)), schematic).await?;

        Ok(format!(
            "Project created: {} ({}.pro, {}.sch, {} component(s))",
            project_dir.display(),
            name,
            name,
            components.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_project_and_schematic_files() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateKicadProject::with_base(dir.path().to_path_buf());

        let out = tool.execute("amp: resistor, capacitor").await.unwrap();
        assert!(out.contains("Project created"));
        assert!(out.contains("2 component(s)"));

        let pro = tokio::fs::read_to_string(dir.path().join("amp/amp.pro"))
            .await
            .unwrap();
        assert_eq!(pro, "(kicad_project)\n");

        let sch = tokio::fs::read_to_string(dir.path().join("amp/amp.sch"))
            .await
            .unwrap();
        assert!(sch.starts_with("EESchema Schematic File Version 4\n"));
        assert!(sch.contains("F 1 \"resistor\" H 2000 2000 50  0001 C CNN"));
        assert!(sch.contains("F 2 \"capacitor\" H 2000 2000 50  0001 C CNN"));
    }

    #[tokio::test]
    async fn bare_name_creates_empty_schematic() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateKicadProject::with_base(dir.path().to_path_buf());

        let out = tool.execute("blinky").await.unwrap();
        assert!(out.contains("0 component(s)"));

        let sch = tokio::fs::read_to_string(dir.path().join("blinky/blinky.sch"))
            .await
            .unwrap();
        assert!(!sch.contains("F 1"));
    }

    #[tokio::test]
    async fn rejects_empty_and_traversing_names() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CreateKicadProject::with_base(dir.path().to_path_buf());

        assert!(tool.execute("").await.is_err());
        assert!(tool.execute("../escape").await.is_err());
    }
}
