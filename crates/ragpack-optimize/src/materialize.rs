use ragpack_core::types::{OptimizedResult, ResultKind, ScoredHit};
use ragpack_core::{OptimizationOptions, Tokenizer};

use crate::group::DocumentGroup;

const FULL_DOCUMENT_MIN_AVG: f32 = 0.75;
const SINGLE_HIT_EXPAND_MIN_SCORE: f32 = 0.85;
/// Line placed between reassembled chunks.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Presentation strategy for a group, first match wins:
/// full document, expanded chunk, plain chunk.
pub fn select_kind(group: &DocumentGroup, options: &OptimizationOptions) -> ResultKind {
    let count = group.chunk_count();
    if count >= options.full_document_threshold && group.avg_score > FULL_DOCUMENT_MIN_AVG {
        ResultKind::FullDocument
    } else if count >= 2 || (count == 1 && group.avg_score > SINGLE_HIT_EXPAND_MIN_SCORE) {
        ResultKind::ExpandedChunk
    } else {
        ResultKind::Chunk
    }
}

/// Build the presented text for `group` and measure it.
pub fn materialize(
    group: &DocumentGroup,
    kind: ResultKind,
    options: &OptimizationOptions,
    tokenizer: &dyn Tokenizer,
) -> OptimizedResult {
    let content = match kind {
        ResultKind::FullDocument => {
            let mut ordered: Vec<&ScoredHit> = group.chunks.iter().collect();
            ordered.sort_by_key(|h| h.chunk_index());
            join_hits(&ordered)
        }
        ResultKind::ExpandedChunk if group.chunk_count() > 1 => join_hits(&group.top_hits(options.expanded_chunk_multiplier)),
        ResultKind::ExpandedChunk => group.best_hit().map(expand_hit).unwrap_or_default(),
        ResultKind::Chunk => group.best_hit().map(|h| h.content.clone()).unwrap_or_default(),
    };
    OptimizedResult {
        doc_id: group.doc_id.clone(),
        token_count: tokenizer.count(&content),
        content,
        kind,
        relevance_score: group.relevance_score,
        chunks_found: group.chunk_count(),
        truncated: false,
    }
}

fn join_hits(hits: &[&ScoredHit]) -> String {
    hits.iter().map(|h| h.content.as_str()).collect::<Vec<_>>().join(CHUNK_SEPARATOR)
}

/// Splice the index-provided context around a single hit.
fn expand_hit(hit: &ScoredHit) -> String {
    let parts: Vec<&str> = [hit.metadata.context_before.as_deref(), Some(hit.content.as_str()), hit.metadata.context_after.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    parts.join("\n")
}
