/*!
 * Numeric parameter bound checks.
 *
 * Infiltration rows carry the initial moisture deficit (IMD) in the fourth
 * field; a deficit is a fraction, so values above 1.0 abort solver runs.
 * Rows that are too short or non-numeric are left to the solver.
 */

use crate::document::Document;

use super::engine::{Issue, IssueKind};

const INFILTRATION_SECTION: &str = "INFILTRATION";

const IMD_FIELD: usize = 3;
const IMD_MAX: f64 = 1.0;

const IMD_SUGGESTION: &str = "Set IMD to a value between 0 and 1 (e.g., 0.25)";

/// Check infiltration rows in every INFILTRATION section
pub fn check(document: &Document) -> Vec<Issue> {
    let mut issues = Vec::new();

    for section in document.sections_named(INFILTRATION_SECTION) {
        for (line_no, row) in section.data_lines() {
            let fields: Vec<&str> = row.split_whitespace().collect();
            if fields.len() <= IMD_FIELD {
                continue;
            }
            if let Ok(imd) = fields[IMD_FIELD].parse::<f64>() {
                if imd > IMD_MAX {
                    issues.push(
                        Issue::error(
                            IssueKind::InvalidParameter,
                            line_no,
                            format!("IMD value {imd} > 1.0 (should be 0-1 for GREEN_AMPT)"),
                        )
                        .with_suggestion(IMD_SUGGESTION),
                    );
                }
            }
        }
    }

    issues
}
