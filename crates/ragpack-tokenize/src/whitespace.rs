use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

use ragpack_core::Tokenizer;

/// Lossless word-level tokenizer with a vocabulary built on the fly.
///
/// A token is a run of non-whitespace plus the whitespace that follows it;
/// leading whitespace forms its own token.
///
/// Ids are assigned in first-seen order, so the id of a piece depends on what
/// the instance has encoded before; ids are only meaningful to the instance
/// that issued them. Counts and `truncate` output depend on the text alone.
/// `count` never touches the vocabulary, and `encode` only takes the write
/// lock when it meets a piece it has not seen yet.
#[derive(Default)]
pub struct WhitespaceTokenizer {
    vocab: RwLock<Vocab>,
}

#[derive(Default)]
struct Vocab {
    ids: HashMap<String, u32>,
    pieces: Vec<String>,
}

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.read().unwrap_or_else(|e| e.into_inner()).pieces.len()
    }
}

/// Split before every non-whitespace char that follows whitespace.
fn pieces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_ws = false;
    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if !ws && prev_ws && i > start {
            out.push(&text[start..i]);
            start = i;
        }
        prev_ws = ws;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

impl Tokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        let pieces = pieces(text);
        {
            let vocab = self.vocab.read().unwrap_or_else(|e| e.into_inner());
            let known: Option<Vec<u32>> = pieces.iter().map(|p| vocab.ids.get(*p).copied()).collect();
            if let Some(ids) = known {
                return ids;
            }
        }
        let mut vocab = self.vocab.write().unwrap_or_else(|e| e.into_inner());
        pieces
            .into_iter()
            .map(|piece| {
                if let Some(id) = vocab.ids.get(piece) {
                    return *id;
                }
                let id = vocab.pieces.len() as u32;
                vocab.pieces.push(piece.to_string());
                vocab.ids.insert(piece.to_string(), id);
                id
            })
            .collect()
    }

    fn decode(&self, ids: &[u32]) -> String {
        let vocab = self.vocab.read().unwrap_or_else(|e| e.into_inner());
        let mut out = String::new();
        for id in ids {
            match vocab.pieces.get(*id as usize) {
                Some(piece) => out.push_str(piece),
                None => warn!("Unknown token id {}", id),
            }
        }
        out
    }

    fn count(&self, text: &str) -> usize {
        pieces(text).len()
    }
}
