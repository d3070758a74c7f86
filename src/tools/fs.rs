//! Filesystem tools: list, read, create.

use async_trait::async_trait;

use super::{ArgKind, Tool};

const MAX_READ_BYTES: usize = 20_000;

/// List the entries of a directory.
pub struct ListFiles;

#[async_trait]
impl Tool for ListFiles {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files in a directory. Input is a directory path or a common name like 'desktop' or 'documents'; empty input lists the current directory."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::Path
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let path = if input.is_empty() { "." } else { input };
        let mut entries = tokio::fs::read_dir(path).await?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                name.push('/');
            }
            names.push(name);
        }
        names.sort();

        if names.is_empty() {
            Ok(format!("Directory {} is empty.", path))
        } else {
            Ok(names.join("\n"))
        }
    }
}

/// Read a file's contents.
pub struct ReadFileContent;

#[async_trait]
impl Tool for ReadFileContent {
    fn name(&self) -> &str {
        "read_file_content"
    }

    fn description(&self) -> &str {
        "Read the contents of a text file. Input is the file path."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::Path
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(input).await?;
        let mut content = String::from_utf8_lossy(&bytes).into_owned();
        super::truncate_output(&mut content, MAX_READ_BYTES, "\n... [content truncated]");
        Ok(content)
    }
}

/// Create a file. The first input line is the path, everything after it is
/// the file body.
pub struct CreateFile;

#[async_trait]
impl Tool for CreateFile {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create a file. The first line of the input is the file path; the rest is the file content."
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::FreeText
    }

    async fn execute(&self, input: &str) -> anyhow::Result<String> {
        let (path_line, body) = match input.split_once('\n') {
            Some((path, body)) => (path, body),
            None => (input, ""),
        };
        let path = crate::paths::normalize_path(path_line);
        if path_line.trim().is_empty() {
            anyhow::bail!("no file path given");
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;

        Ok(format!("File created: {}", path.display()))
    }
}
