//! Unit scanner that ties extraction, classification and location together.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::config::Config;

use super::locate::{line_of_offset, snippet_at, DEFAULT_SNIPPET_CONTEXT};
use super::{classify, extract, CodeUnit, Finding, IssueType, ScanResult};

/// Scans code units for TRANSLATE statements using CODE PAGE.
#[derive(Debug, Clone)]
pub struct Scanner {
    snippet_context: usize,
    disabled: HashSet<IssueType>,
    parallel: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            snippet_context: DEFAULT_SNIPPET_CONTEXT,
            disabled: HashSet::new(),
            parallel: true,
        }
    }
}

impl Scanner {
    /// Create a scanner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner from a validated config.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .snippet_context(config.snippet_context)
            .parallel(config.parallel)
            .disable(config.disabled_issue_types())
    }

    /// Set the number of context characters kept around each statement.
    pub fn snippet_context(mut self, chars: usize) -> Self {
        self.snippet_context = chars;
        self
    }

    /// Set whether batches are scanned on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Suppress the given issue types.
    pub fn disable<I: IntoIterator<Item = IssueType>>(mut self, issues: I) -> Self {
        self.disabled.extend(issues);
        self
    }

    /// Scan one unit. The result carries every finding, possibly none.
    pub fn scan_unit(&self, unit: &CodeUnit) -> ScanResult {
        let body = unit.body();
        let mut findings = Vec::new();

        for stmt in extract(body) {
            if stmt.is_commented_out() {
                debug!(
                    unit = %unit.inc_name,
                    offset = stmt.start,
                    "skipping commented-out statement"
                );
                continue;
            }

            let issues = classify(&stmt.stripped()).issues();
            if issues.is_empty() {
                continue;
            }

            let line = line_of_offset(body, stmt.start);
            let snippet = snippet_at(body, stmt.start, stmt.end, self.snippet_context);
            findings.extend(
                issues
                    .into_iter()
                    .filter(|issue| !self.disabled.contains(issue))
                    .map(|issue| Finding::new(unit, issue, line, snippet.clone())),
            );
        }

        debug!(
            program = %unit.pgm_name,
            include = %unit.inc_name,
            findings = findings.len(),
            "scanned unit"
        );

        ScanResult {
            unit: unit.clone(),
            findings,
        }
    }

    /// Scan a batch, keeping only units with findings in input order.
    pub fn scan_batch(&self, units: &[CodeUnit]) -> Vec<ScanResult> {
        let results: Vec<ScanResult> = if self.parallel {
            units.par_iter().map(|u| self.scan_unit(u)).collect()
        } else {
            units.iter().map(|u| self.scan_unit(u)).collect()
        };

        results.into_iter().filter(ScanResult::has_findings).collect()
    }
}

/// Scan a single unit with default settings.
pub fn scan_unit(unit: &CodeUnit) -> ScanResult {
    Scanner::new().scan_unit(unit)
}

/// Scan a batch with default settings.
pub fn scan_batch(units: &[CodeUnit]) -> Vec<ScanResult> {
    Scanner::new().scan_batch(units)
}
