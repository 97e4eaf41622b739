use ragpack_core::types::OptimizedResult;
use ragpack_core::Tokenizer;

/// A result is only cut to fit when more than this many tokens remain.
pub const TRUNCATION_FLOOR: usize = 500;
/// Tokens reserved for, and charged for, the truncation notice.
pub const TRUNCATION_OVERHEAD: usize = 20;
pub const TRUNCATION_NOTICE: &str = "\n\n[... truncated to fit the token budget ...]";

/// Outcome of offering one result to the packer.
#[derive(Debug)]
pub enum Placement {
    Whole(OptimizedResult),
    Truncated(OptimizedResult),
    Stop,
}

/// Greedy, rank-ordered packing state. Results are offered in order and
/// never revisited.
#[derive(Debug)]
pub struct Packer {
    max_tokens: usize,
    used_tokens: usize,
}

impl Packer {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens, used_tokens: 0 }
    }

    pub fn used_tokens(&self) -> usize {
        self.used_tokens
    }

    pub fn remaining(&self) -> usize {
        self.max_tokens.saturating_sub(self.used_tokens)
    }

    /// Accept `result` whole if it fits, cut it down if more than
    /// `TRUNCATION_FLOOR` tokens remain, otherwise signal a stop.
    pub fn offer(&mut self, result: OptimizedResult, tokenizer: &dyn Tokenizer) -> Placement {
        if self.used_tokens + result.token_count <= self.max_tokens {
            self.used_tokens += result.token_count;
            return Placement::Whole(result);
        }
        let remaining = self.remaining();
        if remaining > TRUNCATION_FLOOR {
            let cut = truncate(result, remaining, tokenizer);
            self.used_tokens += cut.token_count;
            return Placement::Truncated(cut);
        }
        Placement::Stop
    }
}

/// Keep `remaining - TRUNCATION_OVERHEAD` tokens and append the notice.
pub fn truncate(mut result: OptimizedResult, remaining: usize, tokenizer: &dyn Tokenizer) -> OptimizedResult {
    let keep = remaining.saturating_sub(TRUNCATION_OVERHEAD);
    let (kept_text, kept) = tokenizer.truncate(&result.content, keep);
    result.content = format!("{}{}", kept_text.trim_end(), TRUNCATION_NOTICE);
    result.token_count = kept + TRUNCATION_OVERHEAD;
    result.truncated = true;
    result
}
