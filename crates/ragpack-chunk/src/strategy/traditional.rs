use ragpack_core::{ChunkingConfig, Tokenizer};

use super::RawChunk;

/// Slide a `chunk_size` token window forward by `chunk_size - chunk_overlap`.
///
/// Offsets are not mapped back into the source: each chunk reports the
/// chunk-local range `[0, content.len())`.
pub fn split(text: &str, config: &ChunkingConfig, tokenizer: &dyn Tokenizer) -> Vec<RawChunk> {
    windows(text, config.chunk_size, config.chunk_overlap, tokenizer)
        .into_iter()
        .map(|content| {
            let end = content.len();
            RawChunk { content, start: 0, end, context: None }
        })
        .collect()
}

/// Decoded, trimmed, non-empty token windows of `text`.
pub(crate) fn windows(text: &str, size: usize, overlap: usize, tokenizer: &dyn Tokenizer) -> Vec<String> {
    let ids = tokenizer.encode(text);
    let step = size.saturating_sub(overlap).max(1);
    let mut out = Vec::new();
    let mut start = 0;
    while start < ids.len() {
        let end = start.saturating_add(size).min(ids.len());
        let decoded = tokenizer.decode(&ids[start..end]);
        let content = decoded.trim();
        if !content.is_empty() {
            out.push(content.to_string());
        }
        start += step;
    }
    out
}
