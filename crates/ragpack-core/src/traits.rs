/// Text <-> token id conversion used to measure and cut text.
///
/// Implementations must be deterministic and reentrant; both the chunking
/// engine and the result optimizer share one instance across calls.
/// `decode(&encode(x))` is expected to reproduce `x`.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;
    fn decode(&self, ids: &[u32]) -> String;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Keep at most `max_tokens` leading tokens of `text`.
    ///
    /// Returns the decoded prefix and the number of tokens kept.
    fn truncate(&self, text: &str, max_tokens: usize) -> (String, usize) {
        let ids = self.encode(text);
        if ids.len() <= max_tokens {
            return (text.to_string(), ids.len());
        }
        (self.decode(&ids[..max_tokens]), max_tokens)
    }
}
