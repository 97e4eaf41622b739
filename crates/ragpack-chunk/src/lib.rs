//! ragpack-chunk
//!
//! Splits documents into context-aware chunks ready for indexing. See
//! `engine` for the entry point and `strategy` for the individual splitters.

pub mod boundaries;
pub mod engine;
pub mod normalize;
pub mod processor;
pub mod strategy;

pub use engine::{chunk_document, ChunkingEngine};
pub use processor::DataProcessor;
