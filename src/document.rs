use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::anyhow;
use log::debug;

// @module: Input document tokenization and dialect detection

// @const: Comment marker shared by both dialects
pub const COMMENT_MARKER: char = ';';

// Section names that exist in exactly one dialect's vocabulary. Names shared
// by both (TITLE, OPTIONS, JUNCTIONS, ...) carry no signal.
const EPANET_MARKERS: [&str; 4] = ["PIPES", "TANKS", "RESERVOIRS", "EMITTERS"];
const SWMM_MARKERS: [&str; 6] = [
    "SUBCATCHMENTS",
    "RAINGAGES",
    "CONDUITS",
    "INFILTRATION",
    "STORAGE",
    "OUTFALLS",
];

// @struct: One bracket-delimited section of an input document
#[derive(Debug, Clone)]
pub struct Section {
    // @field: Canonical name (trimmed, upper-cased, brackets stripped)
    pub name: String,

    // @field: 1-based line number of the [NAME] header
    pub start_line: usize,

    // @field: 1-based line number of the last line belonging to the section
    pub end_line: usize,

    // @field: Body lines in order, header excluded, blanks and comments retained
    pub lines: Vec<String>,
}

impl Section {
    fn open(name: String, start_line: usize) -> Self {
        Section {
            name,
            start_line,
            end_line: start_line,
            lines: Vec::new(),
        }
    }

    /// 1-based source line number of the body line at `index`
    pub fn line_no(&self, index: usize) -> usize {
        self.start_line + 1 + index
    }

    /// Iterate body lines carrying data, with their line numbers.
    /// Blank lines and comment lines are skipped, remaining lines trimmed.
    pub fn data_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().filter_map(|(i, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                None
            } else {
                Some((self.line_no(i), trimmed))
            }
        })
    }

    /// Iterate every body line with its line number, comments included
    pub fn all_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (self.line_no(i), line.as_str()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] lines {}-{} ({} body lines)",
            self.name,
            self.start_line,
            self.end_line,
            self.lines.len()
        )
    }
}

// @enum: The two input vocabularies the rule engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Rainfall-runoff models (subcatchments, conduits, infiltration)
    Swmm,
    /// Pressurized distribution networks (pipes, tanks, reservoirs)
    Epanet,
}

impl Dialect {
    /// Classify a tokenized document by its dialect-distinctive section names.
    ///
    /// EPANET markers are checked first so that a document mixing both
    /// vocabularies gets the stricter topology rules. A document with no
    /// distinctive section at all falls back to SWMM.
    pub fn detect(sections: &[Section]) -> Self {
        let present =
            |names: &[&str]| sections.iter().any(|s| names.iter().any(|n| *n == s.name));
        if present(&EPANET_MARKERS) {
            Dialect::Epanet
        } else if present(&SWMM_MARKERS) {
            Dialect::Swmm
        } else {
            debug!("No dialect-distinctive section found, assuming SWMM");
            Dialect::Swmm
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dialect::Swmm => write!(f, "SWMM"),
            Dialect::Epanet => write!(f, "EPANET"),
        }
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "swmm" => Ok(Dialect::Swmm),
            "epanet" => Ok(Dialect::Epanet),
            _ => Err(anyhow!("Unknown dialect: {s} (expected swmm or epanet)")),
        }
    }
}

// @struct: A tokenized input document
#[derive(Debug, Clone)]
pub struct Document {
    // @field: Source path (local path, or tree path in remote mode)
    pub path: PathBuf,

    // @field: Folder relative to the corpus root, empty at the root
    pub folder: String,

    // @field: Full decoded text, kept for whole-text scans
    pub text: String,

    // @field: Sections in source order, repeats kept separate
    pub sections: Vec<Section>,

    // @field: Detected dialect
    pub dialect: Dialect,
}

impl Document {
    /// Tokenize `text` into sections. Never fails: malformed headers become
    /// body lines and text before the first header is dropped.
    pub fn parse(path: impl Into<PathBuf>, folder: impl Into<String>, text: String) -> Self {
        let sections = tokenize(&text);
        let dialect = Dialect::detect(&sections);
        Document {
            path: path.into(),
            folder: folder.into(),
            text,
            sections,
            dialect,
        }
    }

    /// First section with the given name, if any
    pub fn section(&self, name: &str) -> Option<&Section> {
        let want = name.to_uppercase();
        self.sections.iter().find(|s| s.name == want)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Every section with the given name, in source order
    pub fn sections_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Section> {
        let want = name.to_uppercase();
        self.sections.iter().filter(move |s| s.name == want)
    }

    /// Section names in source order, duplicates included
    pub fn section_order(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// File name component of the source path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn tokenize(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if let Some(name) = header_name(trimmed) {
            sections.push(Section::open(name, line_no));
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
            current.end_line = line_no;
        }
    }

    sections
}

/// Canonical section name when `trimmed` is a well-formed header line
fn header_name(trimmed: &str) -> Option<String> {
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(trimmed[1..trimmed.len() - 1].trim().to_uppercase())
    } else {
        None
    }
}
