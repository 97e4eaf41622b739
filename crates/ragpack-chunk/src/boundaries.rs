//! Semantic boundary detection for the contextual strategy.

use ragpack_core::types::ChunkType;

/// Sorted, de-duplicated byte offsets where a chunk may start or end:
/// document start, every markdown heading line, every paragraph break
/// (`\n\n`, at its first newline) and document end.
pub fn semantic_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = vec![0, text.len()];

    let mut line_start = 0;
    for line in text.split('\n') {
        if ChunkType::classify(line) == ChunkType::Section {
            boundaries.push(line_start);
        }
        line_start += line.len() + 1;
    }

    boundaries.extend(text.match_indices("\n\n").map(|(i, _)| i));
    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries
}
