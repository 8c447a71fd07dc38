/*!
 * Absolute-path detection.
 *
 * Documents carrying absolute paths cannot run outside the machine they
 * were authored on. Two independent checks apply: every absolute FILE
 * reference is flagged where it stands, and the whole text is scanned once
 * for quoted drive-letter or home-directory literals (also catching paths
 * outside FILE rows, e.g. in option values).
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::references::{self, FileReference};

use super::engine::{Issue, IssueKind};

/// Quoted absolute path: a drive letter or a Unix home directory
static ABSOLUTE_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']([C-Z]:\\|/Users/|/home/)"#).expect("Invalid absolute path regex")
});

const REFERENCE_SUGGESTION: &str = "Include this file as auxiliary or use relative path";

/// Flag absolute references individually, plus one document-level issue
/// when the text contains any quoted absolute path literal
pub fn check(document: &Document, file_refs: &[FileReference]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for reference in file_refs {
        if references::is_absolute_path(&reference.target) {
            issues.push(
                Issue::warning(
                    IssueKind::ExternalFile,
                    reference.line,
                    format!("External file reference: {}", reference.target),
                )
                .with_suggestion(REFERENCE_SUGGESTION),
            );
        }
    }

    if ABSOLUTE_PATH_REGEX.is_match(&document.text) {
        issues.push(Issue::warning(
            IssueKind::UnresolvedPath,
            0,
            "Contains absolute file paths (will fail in cloud environment)",
        ));
    }

    issues
}
