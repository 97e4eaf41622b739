use ragpack_core::{ChunkingConfig, Tokenizer};

use super::RawChunk;

/// Greedily pack whole sentences into chunks of at most `chunk_size` tokens.
///
/// A sentence larger than `chunk_size` becomes its own chunk; the last buffer
/// is always flushed.
pub fn split(text: &str, config: &ChunkingConfig, tokenizer: &dyn Tokenizer) -> Vec<RawChunk> {
    let mut out = Vec::new();
    let mut buffer: Option<(usize, usize)> = None;
    let mut buffer_tokens = 0usize;

    for (start, end) in sentence_spans(text) {
        let tokens = tokenizer.count(&text[start..end]);
        buffer = match buffer {
            Some((buf_start, buf_end)) if buffer_tokens + tokens > config.chunk_size => {
                out.extend(RawChunk::trimmed(text, buf_start, buf_end));
                buffer_tokens = tokens;
                Some((start, end))
            }
            Some((buf_start, _)) => {
                buffer_tokens += tokens;
                Some((buf_start, end))
            }
            None => {
                buffer_tokens = tokens;
                Some((start, end))
            }
        };
    }
    if let Some((buf_start, buf_end)) = buffer {
        out.extend(RawChunk::trimmed(text, buf_start, buf_end));
    }
    out
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    is_terminal(c) || matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// Byte ranges of sentences tiling `text`. A sentence ends after terminal
/// punctuation (plus closing quotes/brackets) that is followed by whitespace
/// or the end of text; the trailing whitespace belongs to the sentence.
pub(crate) fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());

    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < chars.len() {
        if !is_terminal(chars[i].1) {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && is_closing(chars[j].1) {
            j += 1;
        }
        if j == chars.len() || chars[j].1.is_whitespace() {
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            let end = byte_at(j);
            spans.push((start, end));
            start = end;
        }
        i = j;
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::sentence_spans;

    fn pieces(text: &str) -> Vec<&str> {
        sentence_spans(text).into_iter().map(|(s, e)| &text[s..e]).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(pieces("One. Two! Three? Four"), vec!["One. ", "Two! ", "Three? ", "Four"]);
    }

    #[test]
    fn keeps_decimals_and_closing_quotes_together() {
        assert_eq!(pieces("Pi is 3.14 today. \"Really?\" Yes."), vec!["Pi is 3.14 today. ", "\"Really?\" ", "Yes."]);
    }
}
