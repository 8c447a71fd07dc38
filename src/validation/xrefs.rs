/*!
 * Cross-reference checks.
 *
 * Citations must name entities the document defines, time-series
 * definitions should precede the gauges citing them, and pipe rows must
 * connect nodes that exist. The topology check samples the first rows of
 * the link table; a broken network shows up immediately and full coverage
 * belongs to the solver.
 */

use std::collections::HashSet;

use crate::document::Document;
use crate::references::EntityReference;
use crate::symbols::SymbolTable;

use super::engine::{Issue, IssueKind};

const SERIES_SECTION: &str = "TIMESERIES";
const GAUGE_SECTION: &str = "RAINGAGES";

const NODE_SECTIONS: [&str; 3] = ["JUNCTIONS", "TANKS", "RESERVOIRS"];
const LINK_SECTION: &str = "PIPES";
const LINK_SAMPLE_ROWS: usize = 10;

/// Flag citations of names the symbol table does not contain
pub fn check_citations(symbols: &SymbolTable, entity_refs: &[EntityReference]) -> Vec<Issue> {
    entity_refs
        .iter()
        .filter(|r| !symbols.contains(r.category, &r.name))
        .map(|r| {
            Issue::error(
                IssueKind::UndefinedReference,
                r.line,
                format!("Undefined {}: {}", r.category.section_name(), r.name),
            )
            .with_suggestion(format!(
                "Define '{}' in [{}] section before [{}]",
                r.name,
                r.category.section_name(),
                r.section
            ))
        })
        .collect()
}

/// Warn once when gauges cite a time series but the defining section comes
/// later in the document
pub fn check_section_order(document: &Document, entity_refs: &[EntityReference]) -> Vec<Issue> {
    if entity_refs.is_empty() {
        return Vec::new();
    }

    let gauges = document.section(GAUGE_SECTION);
    let series = document.section(SERIES_SECTION);
    if let (Some(gauges), Some(series)) = (gauges, series) {
        if gauges.start_line < series.start_line {
            return vec![
                Issue::warning(
                    IssueKind::SectionOrder,
                    0,
                    format!("[{GAUGE_SECTION}] appears before [{SERIES_SECTION}]"),
                )
                .with_suggestion(format!(
                    "Move [{SERIES_SECTION}] section before [{GAUGE_SECTION}]"
                )),
            ];
        }
    }

    Vec::new()
}

/// Check that sampled pipe rows reference defined nodes
pub fn check_node_topology(document: &Document) -> Vec<Issue> {
    let mut nodes: HashSet<&str> = HashSet::new();
    for name in NODE_SECTIONS {
        for section in document.sections_named(name) {
            for (_, row) in section.data_lines() {
                if let Some(id) = row.split_whitespace().next() {
                    nodes.insert(id);
                }
            }
        }
    }

    let mut issues = Vec::new();
    let mut sampled = 0;

    'sections: for section in document.sections_named(LINK_SECTION) {
        for (line_no, row) in section.data_lines() {
            if sampled == LINK_SAMPLE_ROWS {
                break 'sections;
            }
            let fields: Vec<&str> = row.split_whitespace().collect();
            if fields.len() < 3 {
                continue;
            }
            sampled += 1;

            for node in [fields[1], fields[2]] {
                if !nodes.contains(node) {
                    issues.push(Issue::error(
                        IssueKind::MissingNodeReference,
                        line_no,
                        format!("Pipe references undefined node: {node}"),
                    ));
                }
            }
        }
    }

    issues
}
