use ragpack_core::types::OptimizedResult;

/// Render results as markdown blocks, one per document, in the given order.
pub fn render_markdown(results: &[OptimizedResult]) -> String {
    results
        .iter()
        .map(|r| {
            let truncated = if r.truncated { " · truncated" } else { "" };
            format!(
                "## {}\n_{} · relevance {:.2} · {} chunk(s) · {} tokens{}_\n\n{}",
                r.doc_id, r.kind, r.relevance_score, r.chunks_found, r.token_count, truncated, r.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
