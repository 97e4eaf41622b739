use ragpack_core::types::ChunkContext;
use ragpack_core::{ChunkingConfig, Tokenizer};
use tracing::debug;

use super::RawChunk;
use crate::boundaries::semantic_boundaries;
use crate::normalize::ceil_boundary;

/// Rough characters-per-token ratio used to turn a token target into an offset.
const CHARS_PER_TOKEN: usize = 4;
/// Boundaries up to this factor past the target span are still candidates.
const BOUNDARY_REACH: f64 = 1.2;
const ELLIPSIS: &str = "...";

/// Context-preserving ("late") chunking.
///
/// Walks the text choosing, for each chunk, the semantic boundary closest to
/// `position + chunk_size * 4` among those within 1.2x of that span, then
/// tags the chunk with the verbatim text around it. The tokenizer is not used
/// for boundary selection; the engine measures the resulting chunks.
pub fn split(text: &str, config: &ChunkingConfig, _tokenizer: &dyn Tokenizer) -> Vec<RawChunk> {
    let len = text.len();
    let boundaries = semantic_boundaries(text);
    let span = config.chunk_size.saturating_mul(CHARS_PER_TOKEN);
    let reach = (span as f64 * BOUNDARY_REACH) as usize;
    debug!("Contextual pass over {} bytes with {} boundaries", len, boundaries.len());

    let mut out = Vec::new();
    let mut position = 0usize;
    while position < len {
        let target = position.saturating_add(span);
        let limit = position.saturating_add(reach);
        let end = boundaries
            .iter()
            .copied()
            .filter(|b| *b > position && *b <= limit)
            .min_by_key(|b| b.abs_diff(target))
            .unwrap_or_else(|| target.min(len));
        let end = ceil_boundary(text, end);

        if let Some(mut raw) = RawChunk::trimmed(text, position, end) {
            raw.context = Some(context_window(text, raw.start, raw.end, config.context_window_chars));
            out.push(raw);
        }
        if end >= len {
            break;
        }
        let step = config.chunk_size - config.chunk_overlap;
        let next = position.saturating_add(step).max(end.saturating_sub(config.chunk_overlap));
        position = ceil_boundary(text, next);
    }
    out
}

/// Up to `chars` characters either side of `[start, end)`, marked with an
/// ellipsis on the side facing away from the chunk.
pub(crate) fn context_window(text: &str, start: usize, end: usize, chars: usize) -> ChunkContext {
    let before = (start > 0 && chars > 0).then(|| {
        let from = text[..start].char_indices().rev().nth(chars - 1).map(|(i, _)| i).unwrap_or(0);
        format!("{}{}", ELLIPSIS, &text[from..start])
    });
    let after = (end < text.len() && chars > 0).then(|| {
        let to = text[end..].char_indices().nth(chars).map(|(i, _)| end + i).unwrap_or(text.len());
        format!("{}{}", &text[end..to], ELLIPSIS)
    });
    ChunkContext { before, after, document_length: text.len() }
}
