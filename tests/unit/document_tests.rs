/*!
 * Tests for input document tokenization and dialect detection
 */

use std::str::FromStr;

use inpvet::document::{Dialect, Document};
use crate::common;

fn parse(text: &str) -> Document {
    Document::parse("test.inp", "", text.to_string())
}

/// Test that text before the first section header is dropped
#[test]
fn test_parse_withPreHeaderText_shouldDropIt() {
    let doc = parse("exported by tool v2\nsome banner\n[OPTIONS]\nFLOW_UNITS CFS\n");

    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].name, "OPTIONS");
    assert_eq!(doc.sections[0].start_line, 3);
    assert_eq!(doc.sections[0].lines, vec!["FLOW_UNITS CFS"]);
}

/// Test that a header missing its closing bracket stays a body line
#[test]
fn test_parse_withMalformedHeader_shouldTreatAsBody() {
    let doc = parse("[OPTIONS]\n[JUNCTIONS\nJ1 0 0\n");

    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].lines, vec!["[JUNCTIONS", "J1 0 0"]);
}

/// Test that repeated sections are kept as separate entries
#[test]
fn test_parse_withDuplicateSections_shouldKeepSeparate() {
    let doc = parse(
        "[TIMESERIES]\nTS1 0:00 0.1\n[OPTIONS]\n[TIMESERIES]\nTS2 0:00 0.2\n",
    );

    assert_eq!(doc.sections_named("TIMESERIES").count(), 2);
    assert_eq!(doc.section_order(), vec!["TIMESERIES", "OPTIONS", "TIMESERIES"]);

    // section() returns the first occurrence
    let first = doc.section("TIMESERIES").unwrap();
    assert_eq!(first.start_line, 1);
}

/// Test that header names are trimmed and upper-cased
#[test]
fn test_parse_withMixedCaseHeader_shouldCanonicalize() {
    let doc = parse("  [ Options ]  \nFLOW_UNITS CFS\n");

    assert_eq!(doc.sections[0].name, "OPTIONS");
    assert!(doc.has_section("options"));
    assert!(doc.has_section("OPTIONS"));
}

/// Test 1-based line numbering through the section accessors
#[test]
fn test_parse_lineNumbers_shouldBeOneBased() {
    let doc = parse("[OPTIONS]\n; a comment\n\nFLOW_UNITS CFS\n");
    let section = doc.section("OPTIONS").unwrap();

    assert_eq!(section.start_line, 1);
    assert_eq!(section.end_line, 4);

    // data_lines skips the comment and the blank, keeping source numbering
    let data: Vec<(usize, &str)> = section.data_lines().collect();
    assert_eq!(data, vec![(4, "FLOW_UNITS CFS")]);

    // all_lines keeps everything
    let all: Vec<usize> = section.all_lines().map(|(n, _)| n).collect();
    assert_eq!(all, vec![2, 3, 4]);
}

/// Test that a pipe network is classified as EPANET
#[test]
fn test_detect_withPipeSections_shouldPickEpanet() {
    let doc = parse(common::CLEAN_EPANET_DECK);

    assert_eq!(doc.dialect, Dialect::Epanet);
}

/// Test that a runoff model is classified as SWMM
#[test]
fn test_detect_withSubcatchmentSections_shouldPickSwmm() {
    let doc = parse(common::CLEAN_SWMM_DECK);

    assert_eq!(doc.dialect, Dialect::Swmm);
}

/// Test that a document with both vocabularies is classified as EPANET
#[test]
fn test_detect_withMixedVocabulary_shouldPreferEpanet() {
    let doc = parse("[SUBCATCHMENTS]\nS1 G1 J1 5 25 500 0.5\n[PIPES]\nP1 J1 J2 100\n");

    assert_eq!(doc.dialect, Dialect::Epanet);
}

/// Test that a document with no distinctive section falls back to SWMM
#[test]
fn test_detect_withSharedSectionsOnly_shouldFallBackToSwmm() {
    let doc = parse("[TITLE]\nShared vocabulary only\n[OPTIONS]\n[JUNCTIONS]\nJ1 0 0\n");

    assert_eq!(doc.dialect, Dialect::Swmm);
}

/// Test dialect parsing from user-facing strings
#[test]
fn test_dialect_fromStr_shouldAcceptBothCasings() {
    assert_eq!(Dialect::from_str("swmm").unwrap(), Dialect::Swmm);
    assert_eq!(Dialect::from_str("EPANET").unwrap(), Dialect::Epanet);
    assert!(Dialect::from_str("hec-ras").is_err());
}

/// Test the file name accessor
#[test]
fn test_fileName_withNestedPath_shouldReturnLastComponent() {
    let doc = Document::parse("proj/models/network.inp", "proj/models", String::new());

    assert_eq!(doc.file_name(), "network.inp");
    assert_eq!(doc.folder, "proj/models");
}
