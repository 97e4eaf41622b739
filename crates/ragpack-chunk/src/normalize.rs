//! Text normalization applied before any strategy runs.

/// Normalize line endings and whitespace.
///
/// - `\r\n` and lone `\r` become `\n`
/// - runs of spaces and tabs collapse to one space, trailing line space is dropped
/// - more than one consecutive blank line collapses to a single blank line
/// - the result is trimmed
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0usize;
    for (i, line) in unified.split('\n').enumerate() {
        let line = collapse_spaces(line);
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line);
    }
    out.trim().to_string()
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

/// Smallest char boundary `>= index`.
pub(crate) fn ceil_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_line_endings_and_blank_runs() {
        let raw = "Title\r\n\r\n\r\n\r\nBody  with\t\tspaces   \rnext\n\n\n";
        assert_eq!(normalize(raw), "Title\n\nBody with spaces\nnext");
    }

    #[test]
    fn keeps_single_blank_line() {
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n \n\t\nb"), "a\n\nb");
    }

    #[test]
    fn boundaries_snap_inside_multibyte_chars() {
        let text = "aé b";
        // 'é' occupies bytes 1..3
        assert_eq!(ceil_boundary(text, 1), 1);
        assert_eq!(ceil_boundary(text, 2), 3);
        assert_eq!(ceil_boundary(text, 99), text.len());
    }
}
