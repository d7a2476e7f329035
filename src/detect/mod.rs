//! Detection of TRANSLATE statements using the obsolete CODE PAGE option.

mod classify;
pub mod comments;
pub mod locate;
mod scanner;
mod statements;
mod types;

pub use classify::{classify, Classification};
pub use locate::{line_of_offset, snippet_at, DEFAULT_SNIPPET_CONTEXT};
pub use scanner::{scan_batch, scan_unit, Scanner};
pub use statements::{extract, Statement, Statements};
pub use types::{CodeUnit, Finding, IssueType, ScanResult, Severity};

/// Numeric identifier of this rule.
pub const RULE_ID: u32 = 118;
