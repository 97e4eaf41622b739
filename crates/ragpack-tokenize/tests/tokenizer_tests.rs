use ragpack_tokenize::{load_tokenizer, Tokenizer, WhitespaceTokenizer};

#[test]
fn whitespace_round_trip_is_lossless() {
    let tok = WhitespaceTokenizer::new();
    for text in ["", "one", "  leading and trailing  ", "## Heading\n\nBody text.\tTabbed", "héllo wörld ✓"] {
        let ids = tok.encode(text);
        assert_eq!(tok.decode(&ids), text, "round trip of {:?}", text);
    }
}

#[test]
fn whitespace_ids_are_stable_and_shared() {
    let tok = WhitespaceTokenizer::new();
    let a = tok.encode("the cat the ");
    assert_eq!(a[0], a[2], "same piece gets the same id");
    assert_ne!(a[0], a[1]);
    assert_eq!(tok.encode("the "), vec![a[0]]);
    assert_eq!(tok.vocab_size(), 2);
}

#[test]
fn count_matches_encode_len() {
    let tok = WhitespaceTokenizer::new();
    let text = "a b c d e f g";
    assert_eq!(tok.count(text), tok.encode(text).len());
    assert_eq!(tok.count(text), 7);
}

#[test]
fn truncate_keeps_leading_tokens() {
    let tok = WhitespaceTokenizer::new();
    let (kept, n) = tok.truncate("one two three four", 2);
    assert_eq!(kept, "one two ");
    assert_eq!(n, 2);

    let (whole, n) = tok.truncate("short", 10);
    assert_eq!(whole, "short");
    assert_eq!(n, 1);
}

#[test]
fn load_without_path_falls_back_to_whitespace() {
    let tok = load_tokenizer(None).expect("tokenizer");
    assert_eq!(tok.count("three small words"), 3);
}

#[test]
fn load_missing_file_is_an_error() {
    let missing = std::path::Path::new("/definitely/not/here/tokenizer.json");
    assert!(load_tokenizer(Some(missing)).is_err());
}

#[test]
fn counts_and_truncation_ignore_encoding_history() {
    let fresh = WhitespaceTokenizer::new();
    let used = WhitespaceTokenizer::new();
    used.encode("zeta eta theta four three two one");

    let text = "one two three four five";
    assert_ne!(fresh.encode(text), used.encode(text), "ids are per instance");
    assert_eq!(fresh.count(text), used.count(text));
    assert_eq!(fresh.truncate(text, 3), used.truncate(text, 3));
}

#[test]
fn shared_instance_works_across_threads() {
    let tok = std::sync::Arc::new(WhitespaceTokenizer::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let tok = std::sync::Arc::clone(&tok);
            std::thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        let text = format!("thread{} item{} shared words", t, i);
                        let ids = tok.encode(&text);
                        assert_eq!(tok.decode(&ids), text);
                        tok.count(&text)
                    })
                    .sum::<usize>()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 50 * 4);
    }
    // "shared " and "words" plus one piece per distinct thread and item
    assert_eq!(tok.vocab_size(), 2 + 4 + 50);
}
