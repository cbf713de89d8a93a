//! Text chunking: split extracted document text into bounded-size pieces.
//!
//! Two splitters share the same greedy-accumulate/flush algorithm and differ
//! only in the boundary they respect: [`split_into_chunks`] works on
//! paragraphs (newlines) with a small default limit, [`split_text`] works on
//! sentences (". ") with a larger one. Both preserve original order, emit no
//! empty chunks, and lose nothing except whitespace-only segments.
//!
//! Limits are soft: a single paragraph or sentence longer than the limit is
//! emitted whole as one oversized chunk rather than split mid-token.
//! All sizes are counted in characters, not bytes, so multi-byte text is
//! sized the same way the hosted model's tokenizer will roughly see it.

/// Split on paragraph (newline) boundaries into chunks under `chunk_size`
/// characters.
///
/// Paragraphs are greedily accumulated into a running buffer, joined by
/// single spaces; when the next paragraph would push the buffer to
/// `chunk_size` or beyond, the buffer is flushed (trimmed, dropped if empty)
/// and the triggering paragraph starts the next one.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for para in text.split('\n') {
        let para_chars = para.chars().count();
        if current_chars + para_chars < chunk_size {
            current.push_str(para);
            current.push(' ');
            current_chars += para_chars + 1;
        } else {
            flush(&mut chunks, &current);
            current.clear();
            current.push_str(para);
            current.push(' ');
            current_chars = para_chars + 1;
        }
    }
    flush(&mut chunks, &current);

    chunks
}

/// Split on sentence (". ") boundaries into chunks of at most `max_len`
/// characters.
///
/// Same greedy-accumulate/flush shape as [`split_into_chunks`]; each
/// sentence is re-terminated with ". " as it is appended, so chunk text
/// stays readable prose. A single sentence longer than `max_len` becomes
/// one oversized chunk.
pub fn split_text(text: &str, max_len: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in text.split(". ") {
        let sentence_chars = sentence.chars().count();
        if current_chars + sentence_chars + 1 > max_len {
            flush(&mut chunks, &current);
            current.clear();
            current_chars = 0;
        }
        current.push_str(sentence);
        current.push_str(". ");
        current_chars += sentence_chars + 2;
    }
    flush(&mut chunks, &current);

    chunks
}

/// Push the trimmed buffer if anything remains after trimming.
fn flush(chunks: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Truncate to at most `max_chars` characters, respecting UTF-8 boundaries.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collapse all whitespace runs so reconstruction can be compared
    /// independent of the joins the splitter performs.
    fn normalize_ws(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_into_chunks("One paragraph.\nAnother paragraph.", 700);
        assert_eq!(chunks, vec!["One paragraph. Another paragraph."]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_into_chunks("", 700).is_empty());
        assert!(split_into_chunks("\n\n\n", 700).is_empty());
        assert!(split_text("", 3000).is_empty());
        assert!(split_text("   ", 3000).is_empty());
    }

    #[test]
    fn flush_happens_when_limit_would_be_reached() {
        // "A.\n\nB.\n\n" + 800 × "C" with a 700 limit: the short paragraphs
        // accumulate into one chunk, the long paragraph is emitted whole as
        // a second, oversized chunk.
        let text = format!("A.\n\nB.\n\n{}", "C".repeat(800));
        let chunks = split_into_chunks(&text, 700);
        assert_eq!(chunks.len(), 2, "got: {chunks:?}");
        assert_eq!(normalize_ws(&chunks[0]), "A. B.");
        assert_eq!(chunks[1], "C".repeat(800));
    }

    #[test]
    fn no_chunk_is_empty_and_order_is_preserved() {
        let paragraphs: Vec<String> = (0..40).map(|i| format!("Paragraph number {i}.")).collect();
        let text = paragraphs.join("\n\n");
        let chunks = split_into_chunks(&text, 120);

        assert!(chunks.iter().all(|c| !c.trim().is_empty()));

        // Order: paragraph markers must appear in ascending order across
        // the concatenation.
        let joined = chunks.join(" ");
        let mut last = 0;
        for i in 0..40 {
            let marker = format!("Paragraph number {i}.");
            let pos = joined.find(&marker).expect("paragraph lost");
            assert!(pos >= last, "paragraph {i} out of order");
            last = pos;
        }
    }

    #[test]
    fn reconstruction_loses_only_whitespace() {
        let text = "First paragraph.\n\n   \nSecond one here.\nThird.\n";
        let chunks = split_into_chunks(text, 25);
        assert_eq!(normalize_ws(&chunks.join(" ")), normalize_ws(text));
    }

    #[test]
    fn split_text_respects_max_len() {
        let sentences: Vec<String> = (0..30).map(|i| format!("Sentence number {i}")).collect();
        let text = sentences.join(". ");
        let max_len = 80;
        let chunks = split_text(&text, max_len);

        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(
                c.chars().count() <= max_len,
                "chunk over limit ({} chars): {c:?}",
                c.chars().count()
            );
        }
    }

    #[test]
    fn split_text_emits_oversized_sentence_whole() {
        let long = "X".repeat(500);
        let text = format!("Short one. {long}. Tail sentence.");
        let chunks = split_text(&text, 100);

        assert!(chunks.iter().any(|c| c.contains(&long)));
        // The oversized sentence exceeds the limit; everything else stays under.
        for c in chunks.iter().filter(|c| !c.contains(&long)) {
            assert!(c.chars().count() <= 100);
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte: must never split a code point.
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn split_text_counts_chars_not_bytes() {
        // 3-byte chars: a byte-counting splitter would flush three times
        // as often.
        let text = format!("{}. {}", "あ".repeat(40), "い".repeat(40));
        let chunks = split_text(&text, 100);
        assert_eq!(chunks.len(), 1, "got: {chunks:?}");
    }
}
