//! cpcheck - TRANSLATE / CODE PAGE static analysis rule.
//!
//! cpcheck scans ABAP code units for `TRANSLATE` statements that use the
//! obsolete `CODE PAGE` option and reports each problem as a structured
//! finding with severity, line, remediation text and a source snippet.
//!
//! # Architecture
//!
//! - `detect`: comment stripping, statement extraction, classification,
//!   location and the unit scanner
//! - `config`: YAML config schema
//! - `report`: output formatting (pretty, JSON, SARIF)
//! - `serve`: HTTP service (`/remediate-array`, `/health`)
//! - `cli`: command-line interface
//!
//! Scanning is a pure function of its input:
//!
//! ```
//! use cpcheck::{scan_unit, CodeUnit, IssueType};
//!
//! let unit = CodeUnit::new("ZPROG", "ZPROG", "PROG", "TRANSLATE lv_x CODE PAGE CP1.");
//! let result = scan_unit(&unit);
//! assert_eq!(result.findings.len(), 3);
//! assert_eq!(result.findings[0].issue_type, IssueType::TranslateObsoleteCodepage);
//! ```

pub mod cli;
pub mod config;
pub mod detect;
pub mod report;
pub mod serve;

pub use config::{Config, ConfigError};
pub use detect::{
    scan_batch, scan_unit, CodeUnit, Finding, IssueType, ScanResult, Scanner, Severity, RULE_ID,
};
