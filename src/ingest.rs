//! Knowledge ingestion and deletion.
//!
//! Two ingestion paths: the acquired system profile becomes a single
//! document with flattened metadata, and arbitrary project directories are
//! walked, chunked, and embedded. Deletion filters by `source` metadata
//! prefix and removes ids in batches.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use walkdir::WalkDir;

use crate::config::{SYSTEM_COLLECTION, SYSTEM_PROFILE_DOC_ID};
use crate::context::AppContext;
use crate::store::{DocumentChunk, Metadata, StoreError};

/// Target chunk size for document ingestion, in characters.
const CHUNK_SIZE: usize = 1200;

/// Ids deleted per request in [`forget_source`].
const DELETE_BATCH_SIZE: usize = 500;

/// Chunks embedded and inserted per request in [`ingest_directory`].
const ADD_BATCH_SIZE: usize = 64;

/// File extensions considered ingestable text.
const TEXT_EXTENSIONS: &[&str] = &[
    "rs", "py", "md", "txt", "toml", "json", "yaml", "yml", "js", "ts", "sh", "c", "h", "cpp",
    "html", "css", "cfg", "ini",
];

/// Load the acquired system profile and upsert it as one document with
/// flattened metadata.
pub async fn ingest_system_profile(ctx: &AppContext) -> anyhow::Result<()> {
    println!("--- Ingesting system profile ---");

    let raw = tokio::fs::read_to_string(&ctx.config.profile_path)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "could not read profile at {} (run `ark acquire` first): {}",
                ctx.config.profile_path.display(),
                e
            )
        })?;
    let profile: Value = serde_json::from_str(&raw)?;

    let str_at = |path: &[&str]| -> Option<String> {
        let mut node = &profile;
        for key in path {
            node = node.get(key)?;
        }
        node.as_str().map(str::to_string)
    };

    let cpu_model = str_at(&["cpu_info", "model_name"]);
    let total_memory = str_at(&["memory_info", "total_memory"]);

    let document = format!(
        "This document contains the system profile. CPU is {}. Total memory is {}.",
        cpu_model.as_deref().unwrap_or("unknown"),
        total_memory.as_deref().unwrap_or("unknown"),
    );

    let gpu_models = profile
        .get("gpu_info")
        .and_then(|v| v.as_array())
        .map(|gpus| {
            gpus.iter()
                .filter_map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut metadata: Metadata = HashMap::new();
    metadata.insert("doc_type".to_string(), Value::from("system_profile"));
    metadata.insert("source".to_string(), Value::from("system_profile"));
    if let Some(cpu_model) = cpu_model {
        metadata.insert("cpu_model".to_string(), Value::from(cpu_model));
    }
    if let Some(cores) = str_at(&["cpu_info", "cpu_cores"]) {
        metadata.insert("cpu_cores".to_string(), Value::from(cores));
    }
    if let Some(total_memory) = total_memory {
        metadata.insert("total_memory".to_string(), Value::from(total_memory));
    }
    if !gpu_models.is_empty() {
        metadata.insert("gpu_models".to_string(), Value::from(gpu_models));
    }
    if let Some(kernel) = str_at(&["kernel_info"]) {
        metadata.insert("kernel_info".to_string(), Value::from(kernel));
    }
    metadata.insert(
        "ingested_at".to_string(),
        Value::from(chrono::Utc::now().to_rfc3339()),
    );

    let embedding = ctx.embedder.embed(&document).await?;
    ctx.store
        .add(
            SYSTEM_COLLECTION,
            &[DocumentChunk {
                id: SYSTEM_PROFILE_DOC_ID.to_string(),
                document,
                embedding,
                metadata,
            }],
        )
        .await?;

    let count = ctx.store.count(SYSTEM_COLLECTION).await?;
    println!(
        "Ingested system profile into '{}' ({} documents total).",
        SYSTEM_COLLECTION, count
    );
    Ok(())
}

/// Walk `root`, chunk every text file, and embed the chunks into
/// `collection` with `source` metadata.
pub async fn ingest_directory(
    ctx: &AppContext,
    root: &Path,
    collection: &str,
) -> anyhow::Result<()> {
    println!(
        "--- Ingesting '{}' into collection '{}' ---",
        root.display(),
        collection
    );

    let mut pending: Vec<DocumentChunk> = Vec::new();
    let mut files = 0usize;
    let mut chunks = 0usize;

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !is_text_file(path) {
            continue;
        }
        let Ok(content) = tokio::fs::read_to_string(path).await else {
            tracing::debug!(path = %path.display(), "skipping unreadable file");
            continue;
        };
        if content.trim().is_empty() {
            continue;
        }
        files += 1;

        let source = path.display().to_string();
        for (index, chunk) in chunk_text(&content, CHUNK_SIZE).into_iter().enumerate() {
            let embedding = ctx.embedder.embed(&chunk).await?;

            let mut metadata: Metadata = HashMap::new();
            metadata.insert("source".to_string(), Value::from(source.clone()));
            metadata.insert("chunk".to_string(), Value::from(index as u64));

            pending.push(DocumentChunk {
                id: uuid::Uuid::new_v4().to_string(),
                document: chunk,
                embedding,
                metadata,
            });
            chunks += 1;

            if pending.len() >= ADD_BATCH_SIZE {
                ctx.store.add(collection, &pending).await?;
                pending.clear();
            }
        }
    }

    ctx.store.add(collection, &pending).await?;

    println!(
        "Ingested {} chunks from {} files into '{}'.",
        chunks, files, collection
    );
    Ok(())
}

/// Delete every document whose `source` starts with `source_path`, treated
/// as a directory prefix.
pub async fn forget_source(
    ctx: &AppContext,
    collection: &str,
    source_path: &str,
) -> anyhow::Result<()> {
    println!(
        "--- Deleting documents from '{}' under '{}' ---",
        collection, source_path
    );

    let all = match ctx.store.get_all_metadata(collection).await {
        Ok(all) => all,
        Err(StoreError::CollectionNotFound(name)) => {
            println!("Collection '{}' not found. Nothing to delete.", name);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut prefix = source_path.to_string();
    if !prefix.ends_with(std::path::MAIN_SEPARATOR) {
        prefix.push(std::path::MAIN_SEPARATOR);
    }

    let ids: Vec<String> = all
        .into_iter()
        .filter(|(_, metadata)| {
            metadata
                .get("source")
                .and_then(|v| v.as_str())
                .is_some_and(|source| source.starts_with(&prefix))
        })
        .map(|(id, _)| id)
        .collect();

    if ids.is_empty() {
        println!("No documents matched. Nothing to delete.");
        return Ok(());
    }

    println!("Deleting {} document chunks...", ids.len());
    for batch in ids.chunks(DELETE_BATCH_SIZE) {
        ctx.store.delete(collection, batch).await?;
    }

    let remaining = ctx.store.count(collection).await?;
    println!(
        "Deleted {} documents; {} remain in '{}'.",
        ids.len(),
        remaining,
        collection
    );
    Ok(())
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Split text into chunks of roughly `target` characters, preferring
/// paragraph boundaries.
fn chunk_text(text: &str, target: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        // Oversized paragraphs are split hard at char boundaries.
        if paragraph.len() > target {
            if !current.trim().is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut rest = paragraph;
            while rest.len() > target {
                let mut cut = target;
                while !rest.is_char_boundary(cut) {
                    cut -= 1;
                }
                chunks.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
            if !rest.trim().is_empty() {
                current = rest.to_string();
            }
            continue;
        }

        if current.len() + paragraph.len() + 2 > target && !current.trim().is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("hello world", 100);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn paragraphs_are_grouped_up_to_target() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 12);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "aaaa\n\nbbbb");
        assert_eq!(chunks[1], "cccc");
    }

    #[test]
    fn oversized_paragraph_is_split_hard() {
        let text = "x".repeat(2500);
        let chunks = chunk_text(&text, 1000);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 1000));
        assert_eq!(chunks.iter().map(String::len).sum::<usize>(), 2500);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(800);
        let chunks = chunk_text(&text, 1000);
        assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == 'é')));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("\n\n\n\n", 100).is_empty());
    }

    #[test]
    fn text_file_detection() {
        assert!(is_text_file(Path::new("a/b/readme.md")));
        assert!(is_text_file(Path::new("main.RS")));
        assert!(!is_text_file(Path::new("image.png")));
        assert!(!is_text_file(Path::new("no_extension")));
    }
}
