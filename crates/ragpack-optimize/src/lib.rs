//! ragpack-optimize
//!
//! Turns a flat list of scored retrieval hits into a few coherent,
//! budget-respecting text blocks: hits are grouped per document, groups are
//! ranked, each group picks a presentation strategy and the results are
//! packed greedily into the token budget.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use ragpack_core::types::{OptimizationStats, OptimizedResult, ScoredHit, StrategyCounts};
use ragpack_core::{OptimizationOptions, Result, Tokenizer};

pub mod group;
pub mod materialize;
pub mod pack;
pub mod render;

pub use group::DocumentGroup;
pub use render::render_markdown;

use group::{group_hits, rank_groups};
use materialize::{materialize, select_kind};
use pack::{Packer, Placement};

/// Results and statistics of one `optimize` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationOutput {
    pub results: Vec<OptimizedResult>,
    pub stats: OptimizationStats,
}

pub struct ResultOptimizer {
    options: OptimizationOptions,
    tokenizer: Arc<dyn Tokenizer>,
}

impl ResultOptimizer {
    pub fn new(options: OptimizationOptions, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, tokenizer })
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Grouped and scored hits in rank order.
    pub fn rank(&self, hits: &[ScoredHit]) -> Vec<DocumentGroup> {
        let mut groups = group_hits(hits, self.tokenizer.as_ref());
        rank_groups(&mut groups);
        groups
    }

    pub fn optimize(&self, hits: &[ScoredHit]) -> OptimizationOutput {
        if hits.is_empty() {
            return OptimizationOutput::default();
        }
        let tokenizer = self.tokenizer.as_ref();
        let groups = self.rank(hits);
        let total_original_tokens: usize = groups.iter().map(|g| g.total_tokens).sum();
        debug!("Optimizing {} hits across {} documents", hits.len(), groups.len());

        let mut packer = Packer::new(self.options.max_tokens());
        let mut results = Vec::new();
        for group in &groups {
            let kind = select_kind(group, &self.options);
            let result = materialize(group, kind, &self.options, tokenizer);
            debug!(
                "{}: {} hits, avg {:.3}, relevance {:.3} -> {} ({} tokens)",
                group.doc_id,
                group.chunk_count(),
                group.avg_score,
                group.relevance_score,
                kind,
                result.token_count
            );
            match packer.offer(result, tokenizer) {
                Placement::Whole(result) => results.push(result),
                Placement::Truncated(result) => {
                    debug!("{} truncated to {} tokens", result.doc_id, result.token_count);
                    results.push(result);
                    break;
                }
                Placement::Stop => {
                    debug!(
                        "Budget exhausted ({} used, {} left), stopping at {}",
                        packer.used_tokens(),
                        packer.remaining(),
                        group.doc_id
                    );
                    break;
                }
            }
        }

        let stats = self.stats(&results, total_original_tokens);
        debug!("Returned {}; utilization {:.3}", stats.strategies, stats.utilization);
        OptimizationOutput { results, stats }
    }

    fn stats(&self, results: &[OptimizedResult], total_original_tokens: usize) -> OptimizationStats {
        let total_optimized_tokens: usize = results.iter().map(|r| r.token_count).sum();
        let mut strategies = StrategyCounts::default();
        for result in results {
            strategies.record(result.kind);
        }
        OptimizationStats {
            total_original_tokens,
            total_optimized_tokens,
            utilization: total_optimized_tokens as f64 / self.options.token_budget as f64,
            documents_returned: results.len(),
            strategies,
        }
    }
}
