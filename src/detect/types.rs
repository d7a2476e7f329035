//! Core types for scan input and results.

use serde::{Deserialize, Serialize};

/// Severity levels for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Issue types reported for TRANSLATE statements, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    TranslateObsoleteCodepage,
    TranslateLegacyCp1Cp2,
    TranslateMissingFromTo,
    TranslateNonCharacterRisk,
}

impl IssueType {
    /// All issue types in the order checks are evaluated.
    pub const ALL: [IssueType; 4] = [
        IssueType::TranslateObsoleteCodepage,
        IssueType::TranslateLegacyCp1Cp2,
        IssueType::TranslateMissingFromTo,
        IssueType::TranslateNonCharacterRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::TranslateObsoleteCodepage => "TranslateObsoleteCodepage",
            IssueType::TranslateLegacyCp1Cp2 => "TranslateLegacyCp1Cp2",
            IssueType::TranslateMissingFromTo => "TranslateMissingFromTo",
            IssueType::TranslateNonCharacterRisk => "TranslateNonCharacterRisk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        IssueType::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn severity(&self) -> Severity {
        match self {
            IssueType::TranslateObsoleteCodepage | IssueType::TranslateLegacyCp1Cp2 => {
                Severity::Warning
            }
            IssueType::TranslateMissingFromTo | IssueType::TranslateNonCharacterRisk => {
                Severity::Info
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IssueType::TranslateObsoleteCodepage => {
                "TRANSLATE uses CODE PAGE option (legacy/obsolete). Prefer FROM/TO CODE PAGE or CL_ABAP_CONV_CODEPAGE."
            }
            IssueType::TranslateLegacyCp1Cp2 => {
                "TRANSLATE references CP1/CP2 (legacy code pages)."
            }
            IssueType::TranslateMissingFromTo => {
                "TRANSLATE with CODE PAGE should specify FROM CODE PAGE and/or TO CODE PAGE explicitly."
            }
            IssueType::TranslateNonCharacterRisk => {
                "TRANSLATE appears to operate on non-character/hex-like data. Ensure character-type variables for code page conversions."
            }
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            IssueType::TranslateObsoleteCodepage => concat!(
                "Example (modern):\n",
                "  TRANSLATE lv_text FROM CODE PAGE 'UTF-8' TO CODE PAGE 'UTF-16'.\n",
                "Or use CL_ABAP_CONV_CODEPAGE for robust conversions."
            ),
            IssueType::TranslateLegacyCp1Cp2 => {
                "Use explicit Unicode pages (e.g., 'UTF-8', 'UTF-16') or CL_ABAP_CONV_CODEPAGE."
            }
            IssueType::TranslateMissingFromTo => {
                "Add FROM CODE PAGE <src> and/or TO CODE PAGE <dst> (e.g., 'UTF-8')."
            }
            IssueType::TranslateNonCharacterRisk => {
                "Use character-type variables (STRING/CHAR) or convert via CL_ABAP_CONV_CODEPAGE."
            }
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_name() -> Option<String> {
    Some(String::new())
}

fn default_line() -> Option<i64> {
    Some(0)
}

fn default_code() -> Option<String> {
    Some(String::new())
}

/// A named source fragment submitted for scanning.
///
/// Location fields are informational and never checked against `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeUnit {
    pub pgm_name: String,
    pub inc_name: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    #[serde(default = "default_name")]
    pub name: Option<String>,
    #[serde(default = "default_line")]
    pub start_line: Option<i64>,
    #[serde(default = "default_line")]
    pub end_line: Option<i64>,
    #[serde(default = "default_code")]
    pub code: Option<String>,
}

impl CodeUnit {
    pub fn new(
        pgm_name: impl Into<String>,
        inc_name: impl Into<String>,
        unit_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            pgm_name: pgm_name.into(),
            inc_name: inc_name.into(),
            unit_type: unit_type.into(),
            name: default_name(),
            start_line: default_line(),
            end_line: default_line(),
            code: Some(code.into()),
        }
    }

    /// Source body, empty when absent.
    pub fn body(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub pgm_name: Option<String>,
    pub inc_name: Option<String>,
    #[serde(rename = "type")]
    pub unit_type: Option<String>,
    pub name: Option<String>,
    pub start_line: Option<i64>,
    pub end_line: Option<i64>,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub line: usize,
    pub message: String,
    pub suggestion: String,
    pub snippet: String,
}

impl Finding {
    /// Build a finding for `issue` inheriting the identity of `unit`.
    pub fn new(unit: &CodeUnit, issue: IssueType, line: usize, snippet: String) -> Self {
        Self {
            pgm_name: Some(unit.pgm_name.clone()),
            inc_name: Some(unit.inc_name.clone()),
            unit_type: Some(unit.unit_type.clone()),
            name: unit.name.clone(),
            start_line: unit.start_line,
            end_line: unit.end_line,
            issue_type: issue,
            severity: issue.severity(),
            line,
            message: issue.message().to_string(),
            suggestion: issue.suggestion().to_string(),
            snippet,
        }
    }
}

/// A code unit together with the findings produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(flatten)]
    pub unit: CodeUnit,
    #[serde(rename = "rule118_findings", default)]
    pub findings: Vec<Finding>,
}

impl ScanResult {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Highest severity among the findings, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_type_roundtrip_names() {
        for issue in IssueType::ALL {
            assert_eq!(IssueType::parse(issue.as_str()), Some(issue));
        }
        assert_eq!(IssueType::parse("translate_obsolete_codepage"), None);
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(IssueType::TranslateObsoleteCodepage.severity(), Severity::Warning);
        assert_eq!(IssueType::TranslateLegacyCp1Cp2.severity(), Severity::Warning);
        assert_eq!(IssueType::TranslateMissingFromTo.severity(), Severity::Info);
        assert_eq!(IssueType::TranslateNonCharacterRisk.severity(), Severity::Info);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_unit_defaults_from_json() {
        let unit: CodeUnit =
            serde_json::from_str(r#"{"pgm_name":"ZPROG","inc_name":"ZINC","type":"PROG"}"#)
                .unwrap();
        assert_eq!(unit.name.as_deref(), Some(""));
        assert_eq!(unit.start_line, Some(0));
        assert_eq!(unit.body(), "");
    }

    #[test]
    fn test_scan_result_json_shape() {
        let unit = CodeUnit::new("ZPROG", "ZINC", "PROG", "");
        let finding = Finding::new(&unit, IssueType::TranslateMissingFromTo, 3, "x".into());
        let result = ScanResult {
            unit,
            findings: vec![finding],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["pgm_name"], "ZPROG");
        assert_eq!(value["type"], "PROG");
        assert_eq!(value["code"], "");
        let finding = &value["rule118_findings"][0];
        assert_eq!(finding["issue_type"], "TranslateMissingFromTo");
        assert_eq!(finding["severity"], "info");
        assert_eq!(finding["type"], "PROG");
        assert_eq!(finding["line"], 3);
    }
}
