/*!
 * Tests for external-file and entity reference extraction
 */

use inpvet::document::Document;
use inpvet::references::{self, FileReference};
use inpvet::symbols::SymbolCategory;

fn parse(text: &str) -> Document {
    Document::parse("test.inp", "", text.to_string())
}

fn targets(refs: &[FileReference]) -> Vec<&str> {
    refs.iter().map(|r| r.target.as_str()).collect()
}

/// Test the three path token forms the FILE marker accepts
#[test]
fn test_fileReferences_withQuotedAndBareTokens_shouldExtractAll() {
    let doc = parse(
        "[TEMPERATURE]\n\
         FILE \"climate data.dat\"\n\
         [EVAPORATION]\n\
         FILE 'pan.dat'\n\
         [RAINGAGES]\n\
         G1 VOLUME 1.0 1.0 FILE rain.dat\n",
    );

    let refs = references::file_references(&doc);

    assert_eq!(targets(&refs), vec!["climate data.dat", "pan.dat", "rain.dat"]);
    assert_eq!(refs[0].line, 2);
    assert_eq!(refs[0].section, "TEMPERATURE");
    assert_eq!(refs[2].section, "RAINGAGES");
}

/// Test that the FILE keyword matches case-insensitively
#[test]
fn test_fileReferences_withLowercaseKeyword_shouldMatch() {
    let doc = parse("[TEMPERATURE]\nfile climate.dat\n");

    let refs = references::file_references(&doc);

    assert_eq!(targets(&refs), vec!["climate.dat"]);
}

/// Test that backdrop image rows are never extracted
#[test]
fn test_fileReferences_withBackdropSection_shouldSkipIt() {
    let doc = parse(
        "[BACKDROP]\n\
         FILE \"street_map.png\"\n\
         [TEMPERATURE]\n\
         FILE climate.dat\n",
    );

    let refs = references::file_references(&doc);

    assert_eq!(targets(&refs), vec!["climate.dat"]);
}

/// Test that commented rows still yield references
#[test]
fn test_fileReferences_withCommentedRow_shouldStillExtract() {
    let doc = parse("[TEMPERATURE]\n; FILE climate.dat\n");

    let refs = references::file_references(&doc);

    assert_eq!(targets(&refs), vec!["climate.dat"]);
}

/// Test that duplicate targets are kept at this layer
#[test]
fn test_fileReferences_withDuplicateTargets_shouldKeepBoth() {
    let doc = parse(
        "[TEMPERATURE]\n\
         FILE climate.dat\n\
         [EVAPORATION]\n\
         FILE climate.dat\n",
    );

    let refs = references::file_references(&doc);

    assert_eq!(refs.len(), 2);
}

/// Test that a word containing "file" does not trigger the marker
#[test]
fn test_fileReferences_withProfileKeyword_shouldNotMatch() {
    let doc = parse("[OPTIONS]\nPROFILE summer.cfg\n");

    let refs = references::file_references(&doc);

    assert!(refs.is_empty());
}

/// Test time-series citations on gauge rows
#[test]
fn test_entityReferences_withGaugeCitations_shouldExtractNames() {
    let doc = parse(
        "[RAINGAGES]\n\
         G1 INTENSITY 1:00 1.0 TIMESERIES TS_2yr\n\
         G2 INTENSITY 1:00 1.0 timeseries ts_10yr\n\
         G3 VOLUME 1.0 1.0 FILE gage.dat\n",
    );

    let refs = references::entity_references(&doc);

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].category, SymbolCategory::TimeSeries);
    // The cited name keeps its original casing
    assert_eq!(refs[0].name, "TS_2yr");
    assert_eq!(refs[1].name, "ts_10yr");
    assert_eq!(refs[0].line, 2);
}

/// Test that a trailing keyword with no name yields nothing
#[test]
fn test_entityReferences_withKeywordButNoName_shouldSkipRow() {
    let doc = parse("[RAINGAGES]\nG1 INTENSITY 1:00 1.0 TIMESERIES\n");

    let refs = references::entity_references(&doc);

    assert!(refs.is_empty());
}

/// Test absolute path classification across platforms
#[test]
fn test_isAbsolutePath_shouldClassifyCorrectly() {
    assert!(references::is_absolute_path("/srv/data/rain.dat"));
    assert!(references::is_absolute_path("C:\\models\\rain.dat"));
    assert!(references::is_absolute_path("D:\\rain.dat"));
    assert!(!references::is_absolute_path("rain.dat"));
    assert!(!references::is_absolute_path("data/rain.dat"));
}
