//! Extraction of TRANSLATE statements from a source body.

use lazy_static::lazy_static;
use regex::{Matches, Regex};

use super::comments;

lazy_static! {
    /// One statement: the keyword as a whole word through the next period.
    static ref STATEMENT: Regex = Regex::new(r"(?is)\bTRANSLATE\b[^.]*\.").unwrap();
}

/// A statement span within a source body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Byte offset of the keyword.
    pub start: usize,
    /// Byte offset just past the terminating period.
    pub end: usize,
    /// Raw statement text, keyword through terminator.
    pub text: &'a str,
    /// Text on the keyword's line that precedes the keyword.
    pub lead: &'a str,
}

impl<'a> Statement<'a> {
    /// True if the statement carries no code.
    ///
    /// A commented keyword only discards the span when nothing on the
    /// following lines survives stripping. The period search runs through
    /// comments, so such a span can swallow a live statement below it.
    pub fn is_commented_out(&self) -> bool {
        if comments::is_fully_commented(self.text) {
            return true;
        }
        comments::starts_in_comment(self.lead)
            && self.continuation().map_or(true, comments::is_fully_commented)
    }

    /// Span text after the keyword's own line, if the span crosses lines.
    fn continuation(&self) -> Option<&'a str> {
        self.text.find('\n').map(|i| &self.text[i + 1..])
    }

    /// Statement text with comments removed.
    pub fn stripped(&self) -> String {
        comments::strip(self.text)
    }
}

/// Lazy iterator over statements in discovery order.
pub struct Statements<'a> {
    body: &'a str,
    matches: Matches<'static, 'a>,
}

impl<'a> Iterator for Statements<'a> {
    type Item = Statement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.matches.next()?;
        let line_start = self.body[..m.start()].rfind('\n').map_or(0, |i| i + 1);
        Some(Statement {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
            lead: &self.body[line_start..m.start()],
        })
    }
}

/// Find all non-overlapping statements in `body`, left to right.
///
/// An occurrence of the keyword with no period after it yields nothing.
pub fn extract(body: &str) -> Statements<'_> {
    let re: &'static Regex = &STATEMENT;
    Statements {
        body,
        matches: re.find_iter(body),
    }
}
