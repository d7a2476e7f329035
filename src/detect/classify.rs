//! Classification of a comment-free TRANSLATE statement.
//!
//! Every check runs on every statement. A statement can match any
//! combination of them, so one statement yields up to four issues.

use lazy_static::lazy_static;
use regex::Regex;

use super::IssueType;

lazy_static! {
    static ref HAS_CODEPAGE: Regex = Regex::new(r"(?i)\bCODE\s+PAGE\b").unwrap();
    static ref LEGACY_CODEPAGE: Regex = Regex::new(r"(?i)\bCODE\s+PAGE\s+(CP1|CP2)\b").unwrap();
    static ref FROM_CODEPAGE: Regex = Regex::new(r"(?i)\bFROM\s+CODE\s+PAGE\b").unwrap();
    static ref TO_CODEPAGE: Regex = Regex::new(r"(?i)\bTO\s+CODE\s+PAGE\b").unwrap();

    /// Hex literal such as `X'1A2B'`.
    static ref HEX_LITERAL: Regex = Regex::new(r"(?i)\bx'[0-9a-f]+'").unwrap();
    /// Naming conventions for byte buffers and xstrings.
    static ref BINARY_NAME: Regex = Regex::new(r"(?i)\b(lx_|xstr|xstring)\w*\b").unwrap();
}

/// Outcome of every check for one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub has_codepage: bool,
    pub legacy_codepage: bool,
    pub has_from: bool,
    pub has_to: bool,
    pub non_character_risk: bool,
}

impl Classification {
    /// CODE PAGE given without any FROM/TO direction.
    pub fn missing_direction(&self) -> bool {
        self.has_codepage && !(self.has_from || self.has_to)
    }

    /// Issues raised by this statement, in evaluation order.
    pub fn issues(&self) -> Vec<IssueType> {
        let checks = [
            (self.has_codepage, IssueType::TranslateObsoleteCodepage),
            (self.legacy_codepage, IssueType::TranslateLegacyCp1Cp2),
            (self.missing_direction(), IssueType::TranslateMissingFromTo),
            (self.non_character_risk, IssueType::TranslateNonCharacterRisk),
        ];
        checks
            .into_iter()
            .filter_map(|(hit, issue)| hit.then_some(issue))
            .collect()
    }
}

/// Evaluate all checks against comment-stripped statement text.
pub fn classify(stmt: &str) -> Classification {
    Classification {
        has_codepage: HAS_CODEPAGE.is_match(stmt),
        legacy_codepage: LEGACY_CODEPAGE.is_match(stmt),
        has_from: FROM_CODEPAGE.is_match(stmt),
        has_to: TO_CODEPAGE.is_match(stmt),
        non_character_risk: HEX_LITERAL.is_match(stmt) || BINARY_NAME.is_match(stmt),
    }
}
