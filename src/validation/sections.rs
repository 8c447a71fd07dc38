/*!
 * Required-section and model-element presence checks.
 *
 * A document missing a hard-required section cannot be promoted by the
 * acceptance leniency; every gap found here is a missing_section error.
 */

use crate::document::Document;

use super::engine::{DialectRules, Issue, IssueKind};

/// Check required sections and alternative element groups
pub fn check(document: &Document, rules: &DialectRules) -> Vec<Issue> {
    let mut issues = Vec::new();

    for name in rules.required_sections {
        if !document.has_section(name) {
            issues.push(Issue::error(
                IssueKind::MissingSection,
                0,
                format!("Missing required section: [{name}]"),
            ));
        }
    }

    for group in rules.element_groups {
        let any_present = group.any_of.iter().any(|name| document.has_section(name));
        if !any_present {
            issues.push(Issue::error(IssueKind::MissingSection, 0, group.message));
        }
    }

    issues
}
