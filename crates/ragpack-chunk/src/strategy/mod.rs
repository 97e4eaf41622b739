//! Chunking strategies.
//!
//! Each strategy turns normalized text into `RawChunk`s. The engine then
//! measures, filters and numbers them.

use ragpack_core::types::ChunkContext;

pub mod contextual;
pub mod semantic;
pub mod sentence;
pub mod traditional;

/// Strategy output before token filtering and numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    pub content: String,
    pub start: usize,
    pub end: usize,
    pub context: Option<ChunkContext>,
}

impl RawChunk {
    /// Trimmed `text[start..end]` with offsets narrowed to the trimmed slice.
    /// `None` when the slice is only whitespace.
    pub fn trimmed(text: &str, start: usize, end: usize) -> Option<Self> {
        let slice = &text[start..end];
        let content = slice.trim();
        if content.is_empty() {
            return None;
        }
        let lead = slice.len() - slice.trim_start().len();
        let start = start + lead;
        Some(Self { content: content.to_string(), start, end: start + content.len(), context: None })
    }
}
