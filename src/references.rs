/*!
 * Reference extraction from tokenized input documents.
 *
 * Two kinds of references matter downstream: external-file references
 * (the FILE marker followed by a path token) which feed the resolver, and
 * named-entity citations (rain gauge rows citing a time series) which feed
 * the cross-reference rules.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::symbols::SymbolCategory;

/// FILE marker with a quoted or unquoted path token. Alternation order makes
/// the quoted form win, so quoted paths with spaces stay intact.
static FILE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bFILE\s+(?:"([^"]+)"|'([^']+)'|(\S+))"#).expect("Invalid FILE marker regex")
});

/// Section whose body is map rendering metadata; its FILE rows point at
/// display images, not model inputs, and are never extracted.
const EXCLUDED_SECTION: &str = "BACKDROP";

/// Section whose rows can cite a time series by name
const GAUGE_SECTION: &str = "RAINGAGES";

/// Keyword introducing a time-series citation on a gauge row
const TIMESERIES_KEYWORD: &str = "TIMESERIES";

/// An external-file reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    /// Path token exactly as written
    pub target: String,
    /// 1-based source line
    pub line: usize,
    /// Canonical name of the enclosing section
    pub section: String,
}

/// A citation of a named entity defined elsewhere in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
    pub category: SymbolCategory,
    /// Cited name exactly as written
    pub name: String,
    /// 1-based source line
    pub line: usize,
    /// Canonical name of the enclosing section
    pub section: String,
}

/// True when a path token is absolute. Absolute targets are never resolved
/// against the corpus; they surface as issues instead.
pub fn is_absolute_path(target: &str) -> bool {
    target.starts_with('/') || target.contains(":\\") || target.starts_with("C:")
}

/// Extract external-file references in document order.
///
/// Every body line of every section is scanned, comment lines included; a
/// reference can sit anywhere. The only exception is the map-backdrop
/// section, whose whole span is skipped. Duplicate targets are kept; the
/// resolver deduplicates.
pub fn file_references(document: &Document) -> Vec<FileReference> {
    let mut refs = Vec::new();

    for section in &document.sections {
        if section.name == EXCLUDED_SECTION {
            continue;
        }
        for (line_no, line) in section.all_lines() {
            for caps in FILE_MARKER_REGEX.captures_iter(line) {
                let target = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().to_string());
                if let Some(target) = target {
                    refs.push(FileReference {
                        target,
                        line: line_no,
                        section: section.name.clone(),
                    });
                }
            }
        }
    }

    refs
}

/// Extract named-entity citations in document order.
///
/// Gauge rows cite a time series as `... TIMESERIES <name>`; the keyword
/// match is case-insensitive, the cited name is kept verbatim.
pub fn entity_references(document: &Document) -> Vec<EntityReference> {
    let mut refs = Vec::new();

    for section in document.sections_named(GAUGE_SECTION) {
        for (line_no, row) in section.data_lines() {
            let tokens: Vec<&str> = row.split_whitespace().collect();
            let keyword_at = tokens
                .iter()
                .position(|t| t.eq_ignore_ascii_case(TIMESERIES_KEYWORD));
            if let Some(idx) = keyword_at {
                if let Some(name) = tokens.get(idx + 1) {
                    refs.push(EntityReference {
                        category: SymbolCategory::TimeSeries,
                        name: (*name).to_string(),
                        line: line_no,
                        section: section.name.clone(),
                    });
                }
            }
        }
    }

    refs
}
