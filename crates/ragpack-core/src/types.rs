//! Domain types shared by the chunking engine and the result optimizer.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type ChunkId = String;

/// Coarse classification of a chunk's leading content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Text,
    Section,
    Code,
}

impl ChunkType {
    /// Classify trimmed chunk content: fenced code first, then headings.
    pub fn classify(content: &str) -> Self {
        let head = content.trim_start();
        if head.starts_with("```") {
            return ChunkType::Code;
        }
        let hashes = head.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&hashes) && head[hashes..].starts_with(char::is_whitespace) {
            return ChunkType::Section;
        }
        ChunkType::Text
    }
}

/// Verbatim text surrounding a chunk in its source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkContext {
    pub before: Option<String>,
    pub after: Option<String>,
    pub document_length: usize,
}

/// A chunk of a source document that is independently indexed.
///
/// - `id`: `"{doc_id}:{index}"`
/// - `index`: ordinal within the document, contiguous from 0
/// - `start_offset`/`end_offset`: byte range in the normalized document
/// - `token_count`: measured on `content`
/// - `content_hash`: blake3 hex digest of `content`
/// - `context`: only set by the contextual strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub content: String,
    pub index: usize,
    pub total_chunks: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub token_count: usize,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChunkContext>,
}

/// Optional positional and context data attached to a hit by the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HitMetadata {
    #[serde(default, alias = "tokenCount")]
    pub token_count: Option<usize>,
    #[serde(default, alias = "chunkIndex")]
    pub chunk_index: Option<usize>,
    #[serde(default, alias = "contextBefore")]
    pub context_before: Option<String>,
    #[serde(default, alias = "contextAfter")]
    pub context_after: Option<String>,
}

/// A retrieval hit as returned by an external index.
///
/// `score` is produced by the index and is expected in `[0, 1]`; it is only
/// ever aggregated, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredHit {
    #[serde(alias = "documentId")]
    pub doc_id: String,
    pub content: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: HitMetadata,
}

impl ScoredHit {
    pub fn new(doc_id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self { doc_id: doc_id.into(), content: content.into(), score, metadata: HitMetadata::default() }
    }

    pub fn with_metadata(mut self, metadata: HitMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn chunk_index(&self) -> usize {
        self.metadata.chunk_index.unwrap_or(0)
    }
}

/// How a document group is presented in the optimized output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    FullDocument,
    ExpandedChunk,
    Chunk,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::FullDocument => "full_document",
            ResultKind::ExpandedChunk => "expanded_chunk",
            ResultKind::Chunk => "chunk",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One presentation-ready block produced by the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizedResult {
    pub doc_id: String,
    pub content: String,
    pub kind: ResultKind,
    pub relevance_score: f32,
    pub token_count: usize,
    pub chunks_found: usize,
    #[serde(default)]
    pub truncated: bool,
}

/// Number of returned results per presentation strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyCounts {
    pub full_document: usize,
    pub expanded_chunk: usize,
    pub chunk: usize,
}

impl StrategyCounts {
    pub fn record(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::FullDocument => self.full_document += 1,
            ResultKind::ExpandedChunk => self.expanded_chunk += 1,
            ResultKind::Chunk => self.chunk += 1,
        }
    }
}

impl fmt::Display for StrategyCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} full document(s), {} expanded chunk(s), {} chunk(s)",
            self.full_document, self.expanded_chunk, self.chunk
        )
    }
}

/// Summary of a single optimization call.
///
/// `utilization` is relative to the raw token budget, not the utilization
/// target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptimizationStats {
    pub total_original_tokens: usize,
    pub total_optimized_tokens: usize,
    pub utilization: f64,
    pub documents_returned: usize,
    pub strategies: StrategyCounts,
}
