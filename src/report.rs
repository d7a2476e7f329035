//! Output formatting for scan results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the scan result array, identical to the HTTP response body
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use clap::ValueEnum;
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::detect::{Finding, IssueType, ScanResult, Severity, RULE_ID};

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
    Sarif,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            "sarif" => Ok(Format::Sarif),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
                s
            )),
        }
    }
}

/// Write results in the requested format.
pub fn write<W: Write>(
    out: &mut W,
    format: Format,
    path: &str,
    units_scanned: usize,
    results: &[ScanResult],
) -> anyhow::Result<()> {
    match format {
        Format::Json => write_json(out, results),
        Format::Sarif => write_sarif(out, results),
        Format::Pretty => write_pretty(out, path, units_scanned, results),
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write results as a pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, results: &[ScanResult]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "cpcheck";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    pub help: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

/// Artifact URI for a finding: the include name, or the program name when
/// the include is empty.
fn artifact_uri(finding: &Finding) -> String {
    finding
        .inc_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(finding.pgm_name.as_deref())
        .unwrap_or("")
        .to_string()
}

/// Build a SARIF report covering every issue type that occurs in `results`.
pub fn build_sarif(results: &[ScanResult]) -> SarifReport {
    let findings: Vec<&Finding> = results.iter().flat_map(|r| &r.findings).collect();

    let rules: Vec<SarifRule> = IssueType::ALL
        .iter()
        .filter(|issue| findings.iter().any(|f| f.issue_type == **issue))
        .map(|issue| SarifRule {
            id: issue.as_str().to_string(),
            name: issue.as_str().to_string(),
            short_description: SarifMessage {
                text: issue.message().to_string(),
            },
            help: SarifMessage {
                text: issue.suggestion().to_string(),
            },
            default_config: SarifRuleConfig {
                level: map_severity_to_level(issue.severity()).to_string(),
            },
        })
        .collect();

    let sarif_results: Vec<SarifResult> = findings
        .iter()
        .map(|f| SarifResult {
            rule_id: f.issue_type.as_str().to_string(),
            level: map_severity_to_level(f.severity).to_string(),
            message: SarifMessage {
                text: f.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: artifact_uri(f),
                    },
                    region: SarifRegion {
                        start_line: f.line.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results: sarif_results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif<W: Write>(out: &mut W, results: &[ScanResult]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_sarif(results))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty<W: Write>(
    out: &mut W,
    path: &str,
    units_scanned: usize,
    results: &[ScanResult],
) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}  {}",
        TOOL_NAME.cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        format!("rule {}", RULE_ID).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), path)?;
    writeln!(out)?;

    let findings: Vec<&Finding> = results.iter().flat_map(|r| &r.findings).collect();
    let warnings = findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .count();

    if findings.is_empty() {
        writeln!(out, "  {}  no findings", "✓ CLEAN".green())?;
    } else {
        writeln!(
            out,
            "  {}  {} finding{} ({} warning{}) in {} of {} unit{}",
            "✗ FOUND".yellow(),
            findings.len(),
            plural(findings.len()),
            warnings,
            plural(warnings),
            results.len(),
            units_scanned,
            plural(units_scanned)
        )?;
    }
    writeln!(out)?;

    for result in results {
        write_unit(out, result)?;
    }

    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n != 1 {
        "s"
    } else {
        ""
    }
}

fn write_unit<W: Write>(out: &mut W, result: &ScanResult) -> anyhow::Result<()> {
    let unit = &result.unit;
    write!(out, "  {}", unit.pgm_name.bold())?;
    if !unit.inc_name.is_empty() && unit.inc_name != unit.pgm_name {
        write!(out, " / {}", unit.inc_name.blue())?;
    }
    if let Some(name) = unit.name.as_deref().filter(|n| !n.is_empty()) {
        write!(out, " {}", format!("({})", name).dimmed())?;
    }
    writeln!(out)?;
    writeln!(out)?;

    for f in &result.findings {
        write!(out, "    {} ", severity_tag(f.severity))?;
        write!(out, "{:<28}", f.issue_type.as_str().dimmed())?;
        writeln!(out, "{}", format!("line {}", f.line).dimmed())?;
        writeln!(out, "            {}", f.message)?;
        writeln!(out, "            {}", f.snippet.dimmed())?;
        writeln!(out)?;
    }

    Ok(())
}

fn severity_tag(severity: Severity) -> ColoredString {
    match severity {
        Severity::Warning => "WARN ".yellow(),
        Severity::Info => "INFO ".blue(),
    }
}
