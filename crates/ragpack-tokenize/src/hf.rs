use anyhow::{anyhow, Result};
use std::path::Path;
use tokenizers::Tokenizer as HfInner;
use tracing::warn;

use ragpack_core::Tokenizer;

/// Adapter over a HuggingFace `tokenizers` model.
///
/// Special tokens are neither added on encode nor skipped on decode, so token
/// counts reflect the raw text. Byte-level BPE models round-trip exactly;
/// normalizing models (lowercasing, accent stripping) do not.
pub struct HfTokenizer {
    inner: HfInner,
}

impl HfTokenizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = HfInner::from_file(path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", path.display(), e))?;
        Ok(Self { inner })
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        match self.inner.encode(text, false) {
            Ok(encoding) => encoding.get_ids().to_vec(),
            Err(e) => {
                warn!("Tokenization failed ({} bytes): {}", text.len(), e);
                Vec::new()
            }
        }
    }

    fn decode(&self, ids: &[u32]) -> String {
        self.inner.decode(ids, false).unwrap_or_else(|e| {
            warn!("Decoding {} tokens failed: {}", ids.len(), e);
            String::new()
        })
    }
}
