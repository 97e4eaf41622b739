use ragpack_core::{ChunkingConfig, Tokenizer};
use tracing::debug;

use super::{traditional, RawChunk};
use crate::normalize::ceil_boundary;

/// Split on every configured separator in turn, then force-split sections
/// over `max_chunk_size` with token windows.
///
/// Separators stay attached to the start of the section they open, so the
/// sections tile the text and offsets follow a running cursor.
pub fn split(text: &str, config: &ChunkingConfig, tokenizer: &dyn Tokenizer) -> Vec<RawChunk> {
    let mut sections: Vec<(usize, &str)> = vec![(0, text)];
    for separator in &config.separators {
        sections = sections.into_iter().flat_map(|(offset, section)| split_keep(offset, section, separator)).collect();
    }
    debug!("Semantic pass produced {} sections", sections.len());

    let mut out = Vec::new();
    for (offset, section) in sections {
        let Some(raw) = RawChunk::trimmed(text, offset, offset + section.len()) else { continue };
        if tokenizer.count(&raw.content) <= config.max_chunk_size {
            out.push(raw);
            continue;
        }
        debug!("Section at {} exceeds max_chunk_size, splitting by tokens", raw.start);
        for content in traditional::windows(&raw.content, config.chunk_size, config.chunk_overlap, tokenizer) {
            let end = ceil_boundary(text, (raw.start + content.len()).min(raw.end));
            out.push(RawChunk { content, start: raw.start, end, context: None });
        }
    }
    out
}

/// Split `section` before each occurrence of `separator` (never at its start).
fn split_keep<'a>(offset: usize, section: &'a str, separator: &str) -> Vec<(usize, &'a str)> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for (i, _) in section.match_indices(separator) {
        if i > last {
            pieces.push((offset + last, &section[last..i]));
            last = i;
        }
    }
    pieces.push((offset + last, &section[last..]));
    pieces
}
