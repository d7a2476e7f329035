//! Line numbers and context snippets for statement spans.

/// Characters of context kept on each side of a span by default.
pub const DEFAULT_SNIPPET_CONTEXT: usize = 60;

/// 1-based line number of the byte offset `offset` in `text`.
pub fn line_of_offset(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Context window around `[start, end)` with newlines escaped as `\n`.
///
/// The window reaches `context` characters past each side of the span and
/// stops at the text boundaries.
pub fn snippet_at(text: &str, start: usize, end: usize, context: usize) -> String {
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());

    let from = if context == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(context - 1)
            .map_or(0, |(i, _)| i)
    };
    let to = text[end..]
        .char_indices()
        .nth(context)
        .map_or(text.len(), |(i, _)| end + i);

    text[from..to].replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_offset() {
        let text = "a\nb\n\nTRANSLATE x.";
        assert_eq!(line_of_offset(text, 0), 1);
        assert_eq!(line_of_offset(text, 2), 2);
        assert_eq!(line_of_offset(text, 5), 4);
        assert_eq!(line_of_offset(text, 999), 4);
    }

    #[test]
    fn test_snippet_short_text_is_whole_text() {
        let text = "* c\nTRANSLATE x CODE PAGE CP1.\nWRITE x.";
        assert_eq!(
            snippet_at(text, 4, 30, DEFAULT_SNIPPET_CONTEXT),
            "* c\\nTRANSLATE x CODE PAGE CP1.\\nWRITE x."
        );
    }

    #[test]
    fn test_snippet_window_bounds() {
        let text = format!("{}TRANSLATE x.{}", "a".repeat(100), "b".repeat(100));
        let snippet = snippet_at(&text, 100, 112, 60);
        assert_eq!(snippet.len(), 60 + 12 + 60);
        assert!(snippet.starts_with('a'));
        assert!(snippet.ends_with('b'));
        assert!(snippet.contains("TRANSLATE x."));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text = format!("{}TRANSLATE x.", "ä".repeat(10));
        let start = text.find("TRANSLATE").unwrap();
        assert_eq!(snippet_at(&text, start, text.len(), 3), "äääTRANSLATE x.");
    }

    #[test]
    fn test_snippet_has_no_raw_newlines() {
        let text = "\n\nTRANSLATE\nx\n.\n\n";
        let snippet = snippet_at(text, 2, 15, 60);
        assert!(!snippet.contains('\n'));
        assert_eq!(snippet, "\\n\\nTRANSLATE\\nx\\n.\\n\\n");
    }

    #[test]
    fn test_zero_context() {
        let text = "abc TRANSLATE x. def";
        assert_eq!(snippet_at(text, 4, 16, 0), "TRANSLATE x.");
    }
}
