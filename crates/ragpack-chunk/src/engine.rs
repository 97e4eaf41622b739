use std::sync::Arc;

use ragpack_core::types::{ChunkType, DocumentChunk};
use ragpack_core::{ChunkingConfig, ChunkingStrategy, Result, Tokenizer};
use tracing::debug;

use crate::normalize::normalize;
use crate::strategy::{contextual, semantic, sentence, traditional, RawChunk};

/// Splits documents into chunks under one validated configuration.
///
/// The engine keeps no per-document state, so one instance can chunk many
/// documents, including from several threads at once.
pub struct ChunkingEngine {
    config: ChunkingConfig,
    tokenizer: Arc<dyn Tokenizer>,
}

impl ChunkingEngine {
    /// Validates `config` up front; an invalid configuration never produces chunks.
    pub fn new(config: ChunkingConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Normalize `text` and split it with the configured strategy.
    ///
    /// Chunks under `min_chunk_size` tokens are dropped and the survivors are
    /// numbered contiguously from 0. Empty or tiny documents yield no chunks.
    pub fn chunk(&self, text: &str, doc_id: &str) -> Vec<DocumentChunk> {
        let text = normalize(text);
        if text.is_empty() {
            return Vec::new();
        }

        let tokenizer = self.tokenizer.as_ref();
        let raw = match self.config.strategy {
            ChunkingStrategy::Traditional => traditional::split(&text, &self.config, tokenizer),
            ChunkingStrategy::Semantic => semantic::split(&text, &self.config, tokenizer),
            ChunkingStrategy::Sentence => sentence::split(&text, &self.config, tokenizer),
            ChunkingStrategy::Contextual => contextual::split(&text, &self.config, tokenizer),
        };
        let produced = raw.len();

        let mut chunks: Vec<DocumentChunk> = raw
            .into_iter()
            .filter_map(|r| {
                let token_count = tokenizer.count(&r.content);
                (token_count >= self.config.min_chunk_size).then_some((r, token_count))
            })
            .enumerate()
            .map(|(index, (r, token_count))| build_chunk(doc_id, index, r, token_count))
            .collect();

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.total_chunks = total;
        }
        debug!(
            "Chunked '{}' ({} bytes, {}): {} candidates, {} kept",
            doc_id,
            text.len(),
            self.config.strategy,
            produced,
            total
        );
        chunks
    }
}

fn build_chunk(doc_id: &str, index: usize, raw: RawChunk, token_count: usize) -> DocumentChunk {
    let RawChunk { content, start, end, context } = raw;
    DocumentChunk {
        id: format!("{}:{}", doc_id, index),
        doc_id: doc_id.to_string(),
        chunk_type: ChunkType::classify(&content),
        content_hash: blake3::hash(content.as_bytes()).to_hex().to_string(),
        content,
        index,
        total_chunks: 0,
        start_offset: start,
        end_offset: end,
        token_count,
        context,
    }
}

/// One-shot helper: validate `config`, then chunk a single document.
pub fn chunk_document(
    text: &str,
    doc_id: &str,
    config: &ChunkingConfig,
    tokenizer: Arc<dyn Tokenizer>,
) -> Result<Vec<DocumentChunk>> {
    let engine = ChunkingEngine::new(config.clone(), tokenizer)?;
    Ok(engine.chunk(text, doc_id))
}
