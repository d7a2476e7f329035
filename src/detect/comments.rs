//! Comment stripping for single statements.
//!
//! Two comment forms are recognised:
//! - full-line comments: the first non-blank character of a line is `*`
//! - inline comments: everything from a `"` to the end of the line
//!
//! The inline pass has no notion of string literals. A `"` inside a
//! single-quoted literal still starts a comment.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FULL_LINE_COMMENT: Regex = Regex::new(r"(?m)^\s*\*.*$").unwrap();
    static ref INLINE_COMMENT: Regex = Regex::new(r#""[^\n]*"#).unwrap();
}

/// Remove full-line `*` comments, then inline `"` comments.
///
/// Erased regions are replaced with nothing; line terminators survive.
pub fn strip(text: &str) -> String {
    let no_stars = FULL_LINE_COMMENT.replace_all(text, "");
    INLINE_COMMENT.replace_all(&no_stars, "").into_owned()
}

/// True if nothing but comments and whitespace remains after stripping.
pub fn is_fully_commented(text: &str) -> bool {
    strip(text).trim().is_empty()
}

/// True if a keyword preceded by `line_prefix` on its line is inside a comment.
///
/// Unlike [`strip`], this skips over `'...'`, `` `...` `` and `|...|`
/// literals, so a `"` inside a literal does not count.
pub fn starts_in_comment(line_prefix: &str) -> bool {
    if line_prefix.trim_start().starts_with('*') {
        return true;
    }

    let mut literal: Option<char> = None;
    for c in line_prefix.chars() {
        match literal {
            Some(delim) if c == delim => literal = None,
            Some(_) => {}
            None if c == '"' => return true,
            None if matches!(c, '\'' | '`' | '|') => literal = Some(c),
            None => {}
        }
    }
    false
}
