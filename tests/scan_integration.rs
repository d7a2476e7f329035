//! Integration tests for the full scanning pipeline.
//!
//! These tests run the scanner against the fixtures in testdata/ and check
//! findings, their order, line numbers and snippets end to end.

use std::path::PathBuf;

use cpcheck::cli::collect_units;
use cpcheck::config::Config;
use cpcheck::detect::{CodeUnit, IssueType, ScanResult, Scanner, Severity};
use cpcheck::detect::IssueType::*;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load_units() -> Vec<CodeUnit> {
    collect_units(&testdata_path().join("units.json")).expect("should load units.json")
}

fn issue_types(result: &ScanResult) -> Vec<IssueType> {
    result.findings.iter().map(|f| f.issue_type).collect()
}

#[test]
fn test_batch_returns_only_flagged_units() {
    let units = load_units();
    assert_eq!(units.len(), 4);

    let results = Scanner::new().scan_batch(&units);
    let includes: Vec<_> = results.iter().map(|r| r.unit.inc_name.as_str()).collect();
    assert_eq!(includes, vec!["ZCP_DEMO", "ZCP_DEMO_F01"]);
}

#[test]
fn test_directed_translate_is_only_obsolete() {
    let results = Scanner::new().scan_batch(&load_units());
    let demo = &results[0];

    assert_eq!(issue_types(demo), vec![TranslateObsoleteCodepage]);
    assert_eq!(demo.findings[0].severity, Severity::Warning);
    assert_eq!(demo.findings[0].line, 3);
}

#[test]
fn test_form_include_findings_in_order() {
    let results = Scanner::new().scan_batch(&load_units());
    let form = &results[1];

    assert_eq!(
        issue_types(form),
        vec![
            TranslateObsoleteCodepage,
            TranslateLegacyCp1Cp2,
            TranslateMissingFromTo,
            TranslateNonCharacterRisk,
        ]
    );
    let lines: Vec<_> = form.findings.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![3, 3, 3, 4]);

    for f in &form.findings {
        assert_eq!(f.name.as_deref(), Some("CONVERT_LEGACY"));
        assert_eq!(f.start_line, Some(10));
        assert_eq!(f.end_line, Some(20));
        assert_eq!(f.unit_type.as_deref(), Some("INCL"));
        assert!(!f.snippet.contains('\n'));
    }
}

#[test]
fn test_line_numbers_match_newline_count() {
    let units = load_units();
    for result in Scanner::new().scan_batch(&units) {
        let body = result.unit.body();
        for f in &result.findings {
            let line_text = body.lines().nth(f.line - 1).expect("line exists");
            assert!(
                line_text.to_uppercase().contains("TRANSLATE"),
                "line {} of {} should hold the statement start",
                f.line,
                result.unit.inc_name
            );
        }
    }
}

#[test]
fn test_commented_keyword_before_live_statement() {
    let code = "REPORT zcp_mixed.\n\
                * TRANSLATE the buffer first\n\
                TRANSLATE lv_x CODE PAGE CP2.\n\
                lv_y = 1. \" retired: TRANSLATE lv_y CODE PAGE CP1.\n\
                WRITE 'a\"b'. TRANSLATE lv_z CODE PAGE '1100'.";
    let units = vec![CodeUnit::new("ZCP_MIXED", "ZCP_MIXED", "PROG", code)];

    let results = Scanner::new().scan_batch(&units);
    assert_eq!(results.len(), 1);
    assert_eq!(
        issue_types(&results[0]),
        vec![
            TranslateObsoleteCodepage,
            TranslateLegacyCp1Cp2,
            TranslateMissingFromTo,
            TranslateObsoleteCodepage,
            TranslateMissingFromTo,
        ]
    );
    let lines: Vec<_> = results[0].findings.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![2, 2, 2, 5, 5]);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let units = load_units();
    let parallel = Scanner::new().parallel(true).scan_batch(&units);
    let sequential = Scanner::new().parallel(false).scan_batch(&units);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_source_directory_scan() {
    let units = collect_units(&testdata_path().join("src")).expect("should walk src");
    let names: Vec<_> = units.iter().map(|u| u.pgm_name.as_str()).collect();
    assert_eq!(names, vec!["ZCP_HEX", "ZCP_MODERN"]);

    let results = Scanner::new().scan_batch(&units);
    assert_eq!(results.len(), 2);

    let hex = &results[0];
    assert_eq!(
        issue_types(hex),
        vec![
            TranslateNonCharacterRisk,
            TranslateObsoleteCodepage,
            TranslateMissingFromTo,
        ]
    );
    let lines: Vec<_> = hex.findings.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![6, 8, 8]);

    let modern = &results[1];
    assert_eq!(issue_types(modern), vec![TranslateObsoleteCodepage]);
    assert_eq!(modern.findings[0].line, 6);
}

#[test]
fn test_config_file_shapes_scanner() {
    let config_path = testdata_path().join("cpcheck.yaml");
    let config =
        Config::load(Some(config_path.as_path()), &testdata_path()).expect("config should load");
    let scanner = Scanner::from_config(&config);

    let units = collect_units(&testdata_path().join("src")).expect("should walk src");
    let results = scanner.scan_batch(&units);

    let hex = &results[0];
    assert_eq!(
        issue_types(hex),
        vec![TranslateObsoleteCodepage, TranslateMissingFromTo]
    );
    // Ten characters of context on each side of the statement.
    assert_eq!(
        hex.findings[0].snippet,
        "ER CASE.\\n\\nTRANSLATE lv_text\\n  CODE PAGE '1100'. \" legacy "
    );
}

#[test]
fn test_json_roundtrip_of_results() {
    let results = Scanner::new().scan_batch(&load_units());
    let json = serde_json::to_value(&results).expect("serialize");

    let first = &json[0];
    assert_eq!(first["pgm_name"], "ZCP_DEMO");
    assert!(first["code"].as_str().unwrap().starts_with("REPORT"));
    assert_eq!(
        first["rule118_findings"][0]["issue_type"],
        "TranslateObsoleteCodepage"
    );
    assert_eq!(first["rule118_findings"][0]["severity"], "warning");

    let back: Vec<ScanResult> = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, results);
}
