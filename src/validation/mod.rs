/*!
 * Validation rules for tokenized input documents.
 *
 * Every check produces severity-tagged issues rather than failing fast,
 * so a document's full report is available to the acceptance policy:
 * - Required sections and model-element groups per dialect
 * - Infiltration parameter bounds
 * - Cross-references (time-series citations, pipe node topology)
 * - Section ordering
 * - Absolute path detection
 *
 * # Architecture
 *
 * - `sections`: Required-section and element-group presence
 * - `parameters`: Numeric parameter bounds
 * - `xrefs`: Citations, ordering and node topology
 * - `paths`: Absolute-path flags
 * - `engine`: Issue model, dialect descriptors, orchestration
 */

pub mod sections;
pub mod parameters;
pub mod xrefs;
pub mod paths;
pub mod engine;

// Re-export main types
pub use engine::{validate_document, Issue, IssueKind, RuleEngine, Severity, ValidationReport};
