//! Tokenizers for measuring and cutting text.
//!
//! `HfTokenizer` loads a HuggingFace `tokenizer.json`. `WhitespaceTokenizer`
//! needs no model files and is what tests and offline runs use.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub mod hf;
pub mod whitespace;

pub use hf::HfTokenizer;
pub use ragpack_core::Tokenizer;
pub use whitespace::WhitespaceTokenizer;

/// Pick a tokenizer from the environment.
///
/// `APP_TOKENIZER_PATH` (or `TOKENIZER_PATH`) pointing at an existing
/// `tokenizer.json` selects `HfTokenizer`; otherwise `WhitespaceTokenizer`.
pub fn get_default_tokenizer() -> Result<Arc<dyn Tokenizer>> {
    let configured = ["APP_TOKENIZER_PATH", "TOKENIZER_PATH"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(PathBuf::from)
        .find(|p| p.exists());
    load_tokenizer(configured.as_deref())
}

/// Load `HfTokenizer` from `path`, or fall back to `WhitespaceTokenizer` when `None`.
pub fn load_tokenizer(path: Option<&Path>) -> Result<Arc<dyn Tokenizer>> {
    match path {
        Some(path) => {
            let tokenizer = HfTokenizer::from_file(path)?;
            info!("Using tokenizer file {} ({} entries)", path.display(), tokenizer.vocab_size());
            Ok(Arc::new(tokenizer))
        }
        None => {
            info!("No tokenizer file configured, using whitespace tokenizer");
            Ok(Arc::new(WhitespaceTokenizer::new()))
        }
    }
}
