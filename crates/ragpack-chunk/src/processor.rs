//! Directory ingestion: walk a tree of text/markdown files and chunk each one.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use ragpack_core::types::DocumentChunk;

use crate::engine::ChunkingEngine;

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

pub struct DataProcessor {
    engine: ChunkingEngine,
}

impl DataProcessor {
    pub fn new(engine: ChunkingEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ChunkingEngine {
        &self.engine
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        self.process_directory_with(data_dir, None, |_, _, _| {})
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<DocumentChunk>> {
        self.process_directory_with(data_dir, Some(limit), |_, _, _| {})
    }

    /// Chunk the documents under `data_dir`, at most `limit` of them.
    ///
    /// `on_file(done, total, path)` runs after each file, whether it was
    /// chunked or skipped.
    pub fn process_directory_with<F>(&self, data_dir: &Path, limit: Option<usize>, mut on_file: F) -> Result<Vec<DocumentChunk>>
    where
        F: FnMut(usize, usize, &Path),
    {
        if !data_dir.is_dir() {
            bail!("{} is not a directory", data_dir.display());
        }
        let mut files = self.list_documents(data_dir);
        if let Some(limit) = limit.filter(|l| files.len() > *l) {
            files.truncate(limit);
            info!("Limited to first {} files", limit);
        }
        if files.is_empty() {
            info!("No documents found under {}", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            info!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            match self.process_file(file_path, data_dir) {
                Ok(chunks) => all_chunks.extend(chunks),
                Err(e) => warn!("Skipping {}: {:#}", file_path.display(), e),
            }
            on_file(file_index + 1, files.len(), file_path);
        }
        info!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    /// Chunk one file; its document id is the path relative to `root`.
    pub fn process_file(&self, file_path: &Path, root: &Path) -> Result<Vec<DocumentChunk>> {
        let content = self.read_file_content(file_path)?;
        let doc_id = self.extract_doc_id(file_path, root);
        Ok(self.engine.chunk(&content, &doc_id))
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    /// Relative path without extension, `/`-separated: `guides/setup` for
    /// `<root>/guides/setup.md`.
    pub fn extract_doc_id(&self, file_path: &Path, root: &Path) -> String {
        let relative = file_path.strip_prefix(root).unwrap_or(file_path).with_extension("");
        relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
    }

    /// Text and markdown files under `root`, sorted by path.
    pub fn list_documents(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase());
            if ext.as_deref().is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e)) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        files
    }
}
