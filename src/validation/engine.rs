/*!
 * Rule engine orchestrating all document checks.
 *
 * The engine is pure over its inputs: it reads the tokenized document, the
 * symbol table and the extracted references, and produces a report. It does
 * no IO and never judges acceptance; that policy lives with the curator.
 */

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::{Dialect, Document};
use crate::references::{self, EntityReference, FileReference};
use crate::symbols::SymbolTable;

use super::{parameters, paths, sections, xrefs};

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Document usable, but worth attention
    Warning,
    /// Document likely fails in a solver run
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Kind of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ExternalFile,
    InvalidParameter,
    UndefinedReference,
    SectionOrder,
    MissingSection,
    MissingNodeReference,
    UnresolvedPath,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::ExternalFile => "external_file",
            IssueKind::InvalidParameter => "invalid_parameter",
            IssueKind::UndefinedReference => "undefined_reference",
            IssueKind::SectionOrder => "section_order",
            IssueKind::MissingSection => "missing_section",
            IssueKind::MissingNodeReference => "missing_node_reference",
            IssueKind::UnresolvedPath => "unresolved_path",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Kind of check that produced the issue
    #[serde(rename = "type")]
    pub kind: IssueKind,

    /// 1-based source line, 0 for document-level issues
    pub line: usize,

    /// Human-readable description
    pub message: String,

    pub severity: Severity,

    /// Fix hint, when the check has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    /// Create an error issue
    pub fn error(kind: IssueKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
        }
    }

    /// Create a warning issue
    pub fn warning(kind: IssueKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
            severity: Severity::Warning,
            suggestion: None,
        }
    }

    /// Attach a fix hint
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Complete validation report for one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Issues in scan order
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{} issue(s): {} errors, {} warnings",
            self.issues.len(),
            self.error_count(),
            self.warning_count()
        )
    }
}

/// At least one of `any_of` must be present; `message` reports the gap
#[derive(Debug)]
pub struct ElementGroup {
    pub message: &'static str,
    pub any_of: &'static [&'static str],
}

/// What a dialect demands of a document
#[derive(Debug)]
pub struct DialectRules {
    /// Sections that must be present, each reported individually
    pub required_sections: &'static [&'static str],

    /// Alternative groups, each needing at least one member present
    pub element_groups: &'static [ElementGroup],

    /// Whether link rows must reference defined nodes
    pub check_node_topology: bool,
}

static SWMM_RULES: DialectRules = DialectRules {
    required_sections: &["OPTIONS"],
    element_groups: &[ElementGroup {
        message: "Missing model elements: needs SUBCATCHMENTS or JUNCTIONS/CONDUITS",
        any_of: &["SUBCATCHMENTS", "JUNCTIONS", "CONDUITS", "STORAGE"],
    }],
    check_node_topology: false,
};

static EPANET_RULES: DialectRules = DialectRules {
    required_sections: &["JUNCTIONS", "PIPES"],
    element_groups: &[ElementGroup {
        message: "No tanks or reservoirs found (EPANET requires at least one fixed-grade node)",
        any_of: &["TANKS", "RESERVOIRS"],
    }],
    check_node_topology: true,
};

impl DialectRules {
    pub fn for_dialect(dialect: Dialect) -> &'static DialectRules {
        match dialect {
            Dialect::Swmm => &SWMM_RULES,
            Dialect::Epanet => &EPANET_RULES,
        }
    }
}

/// Runs every rule applicable to a dialect over one document
pub struct RuleEngine {
    rules: &'static DialectRules,
}

impl RuleEngine {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            rules: DialectRules::for_dialect(dialect),
        }
    }

    /// Run all rules, issues in scan order
    pub fn run(
        &self,
        document: &Document,
        symbols: &SymbolTable,
        file_refs: &[FileReference],
        entity_refs: &[EntityReference],
    ) -> ValidationReport {
        let mut issues = Vec::new();

        issues.extend(sections::check(document, self.rules));
        issues.extend(parameters::check(document));
        issues.extend(xrefs::check_citations(symbols, entity_refs));
        issues.extend(xrefs::check_section_order(document, entity_refs));
        if self.rules.check_node_topology {
            issues.extend(xrefs::check_node_topology(document));
        }
        issues.extend(paths::check(document, file_refs));

        debug!(
            "Validated {} ({}): {} issue(s)",
            document.path.display(),
            document.dialect,
            issues.len()
        );

        ValidationReport { issues }
    }
}

/// Build symbols and references from the document, then run the engine for
/// its detected dialect. Convenience for single-file validation.
pub fn validate_document(document: &Document) -> ValidationReport {
    let symbols = SymbolTable::build(document);
    let file_refs = references::file_references(document);
    let entity_refs = references::entity_references(document);
    RuleEngine::new(document.dialect).run(document, &symbols, &file_refs, &entity_refs)
}
