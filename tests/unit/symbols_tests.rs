/*!
 * Tests for the symbol table of defined entities
 */

use inpvet::document::Document;
use inpvet::symbols::{SymbolCategory, SymbolTable};

fn parse(text: &str) -> Document {
    Document::parse("test.inp", "", text.to_string())
}

/// Test that each defining section feeds its own category
#[test]
fn test_build_withAllCategories_shouldSeparateThem() {
    let doc = parse(
        "[TIMESERIES]\n\
         TS1 0:00 0.1\n\
         [PATTERNS]\n\
         P1 HOURLY 1.0 1.1\n\
         [CURVES]\n\
         C1 STORAGE 0 100\n",
    );

    let table = SymbolTable::build(&doc);

    assert!(table.contains(SymbolCategory::TimeSeries, "TS1"));
    assert!(table.contains(SymbolCategory::Pattern, "P1"));
    assert!(table.contains(SymbolCategory::Curve, "C1"));
    assert!(!table.contains(SymbolCategory::TimeSeries, "P1"));
    assert_eq!(table.len(SymbolCategory::TimeSeries), 1);
}

/// Test that continuation rows repeating the name collapse to one entry
#[test]
fn test_build_withContinuationRows_shouldKeepOneName() {
    let doc = parse(
        "[TIMESERIES]\n\
         RAIN 0:00 0.1\n\
         RAIN 1:00 0.4\n\
         RAIN 2:00 0.2\n",
    );

    let table = SymbolTable::build(&doc);

    assert_eq!(table.len(SymbolCategory::TimeSeries), 1);
    assert!(table.contains(SymbolCategory::TimeSeries, "RAIN"));
}

/// Test that repeated defining sections all contribute
#[test]
fn test_build_withRepeatedSections_shouldMergeNames() {
    let doc = parse(
        "[TIMESERIES]\n\
         TS1 0:00 0.1\n\
         [OPTIONS]\n\
         [TIMESERIES]\n\
         TS2 0:00 0.2\n",
    );

    let table = SymbolTable::build(&doc);

    assert_eq!(table.len(SymbolCategory::TimeSeries), 2);
    assert!(table.contains(SymbolCategory::TimeSeries, "TS1"));
    assert!(table.contains(SymbolCategory::TimeSeries, "TS2"));
}

/// Test that comments and blank rows define nothing
#[test]
fn test_build_withCommentsAndBlanks_shouldIgnoreThem() {
    let doc = parse(
        "[TIMESERIES]\n\
         ; gauge calibration series\n\
         \n\
         TS1 0:00 0.1\n",
    );

    let table = SymbolTable::build(&doc);

    assert_eq!(table.len(SymbolCategory::TimeSeries), 1);
    assert!(!table.contains(SymbolCategory::TimeSeries, ";"));
}

/// Test that name lookup is case-sensitive
#[test]
fn test_contains_withDifferentCase_shouldNotMatch() {
    let doc = parse("[TIMESERIES]\nRainSeries 0:00 0.1\n");

    let table = SymbolTable::build(&doc);

    assert!(table.contains(SymbolCategory::TimeSeries, "RainSeries"));
    assert!(!table.contains(SymbolCategory::TimeSeries, "rainseries"));
}

/// Test emptiness across a document with no defining sections
#[test]
fn test_isEmpty_withNoDefiningSections_shouldBeTrue() {
    let doc = parse("[OPTIONS]\nFLOW_UNITS CFS\n");

    let table = SymbolTable::build(&doc);

    assert!(table.is_empty());
    assert!(table.names(SymbolCategory::Curve).is_empty());
}
