/*!
 * Tests for curation policy and the run summary wire format
 */

use inpvet::curator::{
    AcceptancePolicy, AcceptedEntry, CurationSummary, RejectedEntry, SUMMARY_FILE,
};
use inpvet::listing::TreePath;
use inpvet::validation::{Issue, IssueKind, ValidationReport};
use crate::common;

/// Test that a strict policy still requires a clean report
#[test]
fn test_acceptancePolicy_withZeroBudget_shouldOnlyAcceptClean() {
    let policy = AcceptancePolicy::new(0);

    let clean = ValidationReport::default();
    assert!(policy.accepts(&clean));

    let one_warning = ValidationReport {
        issues: vec![Issue::warning(
            IssueKind::UnresolvedPath,
            0,
            "Contains absolute file paths (will fail in cloud environment)",
        )],
    };
    assert!(!policy.accepts(&one_warning));
}

/// Test the summary wire format for each rejection reason
#[test]
fn test_rejectReason_serialization_shouldUseSnakeCase() {
    let location = TreePath::new("proj", "model.inp");
    let cases = vec![
        (
            RejectedEntry::read_error(&location, "boom".to_string()),
            "read_error",
        ),
        (
            RejectedEntry::missing_externals(&location, vec!["rain.dat".to_string()]),
            "missing_external_files",
        ),
        (
            RejectedEntry::failed_validation(&location, vec![]),
            "validation_failed",
        ),
        (
            RejectedEntry::copy_failed(&location, "disk full".to_string()),
            "copy_failed",
        ),
    ];

    for (entry, expected) in cases {
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["reason"], expected);
        assert_eq!(json["folder"], "proj");
        assert_eq!(json["filename"], "model.inp");
    }
}

/// Test that nested validation issues keep their wire keys
#[test]
fn test_rejectedEntry_withIssues_shouldSerializeIssueKinds() {
    let entry = RejectedEntry::failed_validation(
        &TreePath::new("proj", "model.inp"),
        vec![Issue::error(
            IssueKind::InvalidParameter,
            9,
            "IMD value 1.8 > 1.0 (should be 0-1 for GREEN_AMPT)",
        )
        .with_suggestion("Set IMD to a value between 0 and 1 (e.g., 0.25)")],
    );

    let json = serde_json::to_value(&entry).unwrap();

    assert_eq!(json["issues"][0]["type"], "invalid_parameter");
    assert_eq!(json["issues"][0]["line"], 9);
    assert_eq!(json["issues"][0]["severity"], "error");
    assert_eq!(
        json["issues"][0]["suggestion"],
        "Set IMD to a value between 0 and 1 (e.g., 0.25)"
    );
}

/// Test the top-level summary keys a downstream pipeline reads
#[test]
fn test_curationSummary_serialization_shouldExposeCounts() {
    let mut summary = CurationSummary {
        total_found: 2,
        ..Default::default()
    };
    summary.valid_files.push(AcceptedEntry {
        folder: "proj".to_string(),
        filename: "model.inp".to_string(),
        external_files: vec![],
        local_path: "curated/proj/model.inp".to_string(),
    });
    summary.invalid_files.push(RejectedEntry::read_error(
        &TreePath::new("other", "broken.inp"),
        "Download failed".to_string(),
    ));
    summary.valid = 1;
    summary.invalid = 1;

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["total_found"], 2);
    assert_eq!(json["valid"], 1);
    assert_eq!(json["invalid"], 1);
    assert_eq!(json["valid_files"][0]["filename"], "model.inp");
    assert_eq!(json["valid_files"][0]["local_path"], "curated/proj/model.inp");
    assert_eq!(json["invalid_files"][0]["error"], "Download failed");
}

/// Test that loading a summary which was never written fails cleanly
#[test]
fn test_curationSummary_load_withMissingFile_shouldError() {
    let temp_dir = common::create_temp_dir().unwrap();

    let result = CurationSummary::load(temp_dir.path().join(SUMMARY_FILE));

    assert!(result.is_err());
}

/// Test the save and load pair keeps entries intact
#[test]
fn test_curationSummary_saveAndLoad_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut summary = CurationSummary {
        total_found: 1,
        ..Default::default()
    };
    summary.invalid_files.push(RejectedEntry::missing_externals(
        &TreePath::new("proj", "model.inp"),
        vec!["rain.dat".to_string(), "evap.dat".to_string()],
    ));
    summary.invalid = 1;

    let written = summary.save(temp_dir.path()).unwrap();
    assert_eq!(written, temp_dir.path().join(SUMMARY_FILE));

    let loaded = CurationSummary::load(&written).unwrap();
    assert_eq!(loaded.total_found, 1);
    assert_eq!(
        loaded.invalid_files[0].missing,
        Some(vec!["rain.dat".to_string(), "evap.dat".to_string()])
    );
}
