use std::collections::HashMap;

use ragpack_core::types::ScoredHit;
use ragpack_core::Tokenizer;

/// Documents with at least this many hits can earn the high-confidence bonus.
const BONUS_MIN_CHUNKS: usize = 3;
const BONUS_MIN_AVG_SCORE: f32 = 0.8;
const BONUS_FACTOR: f32 = 1.5;

/// All hits of one document within a single optimization call.
#[derive(Debug, Clone)]
pub struct DocumentGroup {
    pub doc_id: String,
    pub chunks: Vec<ScoredHit>,
    pub avg_score: f32,
    pub relevance_score: f32,
    pub total_tokens: usize,
}

impl DocumentGroup {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Highest-scoring hit; the earliest one wins a tie.
    pub fn best_hit(&self) -> Option<&ScoredHit> {
        self.chunks.iter().fold(None, |best: Option<&ScoredHit>, hit| match best {
            Some(b) if b.score >= hit.score => Some(b),
            _ => Some(hit),
        })
    }

    /// Up to `n` hits by descending score (stable), then back in document order.
    pub fn top_hits(&self, n: usize) -> Vec<&ScoredHit> {
        let mut ranked: Vec<&ScoredHit> = self.chunks.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked.sort_by_key(|h| h.chunk_index());
        ranked
    }
}

/// Token count of a hit: the index-provided figure when present.
pub fn hit_tokens(hit: &ScoredHit, tokenizer: &dyn Tokenizer) -> usize {
    hit.metadata.token_count.unwrap_or_else(|| tokenizer.count(&hit.content))
}

/// Partition hits by document in first-seen order and score each group.
///
/// `relevance = chunk_count * avg_score`, times 1.5 when the document has at
/// least three hits averaging above 0.8.
pub fn group_hits(hits: &[ScoredHit], tokenizer: &dyn Tokenizer) -> Vec<DocumentGroup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DocumentGroup> = Vec::new();
    for hit in hits {
        let slot = *slots.entry(hit.doc_id.as_str()).or_insert_with(|| {
            groups.push(DocumentGroup {
                doc_id: hit.doc_id.clone(),
                chunks: Vec::new(),
                avg_score: 0.0,
                relevance_score: 0.0,
                total_tokens: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total_tokens += hit_tokens(hit, tokenizer);
        group.chunks.push(hit.clone());
    }

    for group in &mut groups {
        let count = group.chunks.len();
        group.avg_score = group.chunks.iter().map(|h| h.score).sum::<f32>() / count as f32;
        group.relevance_score = count as f32 * group.avg_score;
        if count >= BONUS_MIN_CHUNKS && group.avg_score > BONUS_MIN_AVG_SCORE {
            group.relevance_score *= BONUS_FACTOR;
        }
    }
    groups
}

/// Stable sort by relevance, highest first; ties keep encounter order.
pub fn rank_groups(groups: &mut [DocumentGroup]) {
    groups.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}
