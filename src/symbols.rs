/*!
 * Symbol table of named entities defined by an input document.
 *
 * Time series, patterns and curves are defined in their own sections, one
 * name per data row (continuation rows repeat the name). The table records
 * which names exist so citations elsewhere in the document can be checked.
 * It passes no judgement on duplicates; re-definitions are absorbed.
 */

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::document::Document;

/// Categories of named entities a document can define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory {
    TimeSeries,
    Pattern,
    Curve,
}

impl SymbolCategory {
    pub const ALL: [SymbolCategory; 3] = [
        SymbolCategory::TimeSeries,
        SymbolCategory::Pattern,
        SymbolCategory::Curve,
    ];

    /// Canonical name of the section that defines this category
    pub fn section_name(&self) -> &'static str {
        match self {
            SymbolCategory::TimeSeries => "TIMESERIES",
            SymbolCategory::Pattern => "PATTERNS",
            SymbolCategory::Curve => "CURVES",
        }
    }
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolCategory::TimeSeries => write!(f, "time series"),
            SymbolCategory::Pattern => write!(f, "pattern"),
            SymbolCategory::Curve => write!(f, "curve"),
        }
    }
}

/// Named entities defined by one document
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    time_series: HashSet<String>,
    patterns: HashSet<String>,
    curves: HashSet<String>,
}

impl SymbolTable {
    /// Collect defined names from every defining section of the document,
    /// repeated sections included. The defined name is the first
    /// whitespace-delimited token of each data row.
    pub fn build(document: &Document) -> Self {
        let mut table = SymbolTable::default();

        for category in SymbolCategory::ALL {
            for section in document.sections_named(category.section_name()) {
                for (_, row) in section.data_lines() {
                    if let Some(name) = row.split_whitespace().next() {
                        table.set_mut(category).insert(name.to_string());
                    }
                }
            }
        }

        debug!(
            "Symbol table: {} time series, {} patterns, {} curves",
            table.len(SymbolCategory::TimeSeries),
            table.len(SymbolCategory::Pattern),
            table.len(SymbolCategory::Curve)
        );

        table
    }

    fn set(&self, category: SymbolCategory) -> &HashSet<String> {
        match category {
            SymbolCategory::TimeSeries => &self.time_series,
            SymbolCategory::Pattern => &self.patterns,
            SymbolCategory::Curve => &self.curves,
        }
    }

    fn set_mut(&mut self, category: SymbolCategory) -> &mut HashSet<String> {
        match category {
            SymbolCategory::TimeSeries => &mut self.time_series,
            SymbolCategory::Pattern => &mut self.patterns,
            SymbolCategory::Curve => &mut self.curves,
        }
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, category: SymbolCategory, name: &str) -> bool {
        self.set(category).contains(name)
    }

    pub fn names(&self, category: SymbolCategory) -> &HashSet<String> {
        self.set(category)
    }

    pub fn len(&self, category: SymbolCategory) -> usize {
        self.set(category).len()
    }

    pub fn is_empty(&self) -> bool {
        SymbolCategory::ALL.iter().all(|c| self.set(*c).is_empty())
    }
}
