/*!
 * External-file resolution.
 *
 * A document may point at auxiliary files (rainfall series, climate data)
 * by bare name or relative path. Each target is probed against a ranked
 * list of candidate locations in the source tree; the first hit wins.
 */

use std::collections::HashSet;

use log::debug;

use crate::errors::ListingError;
use crate::listing::{join_tree_path, split_tree_path, TreeListing};
use crate::references::{self, FileReference};

const DEFAULT_DATA_SUBFOLDER: &str = "data";
const DEFAULT_SHARED_FOLDER: &str = "DataFiles";

/// Candidate location for an external file, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Next to the document
    SameFolder,
    /// In a data subfolder under the document's folder
    DataSubfolder,
    /// In the shared data folder at the corpus root
    SharedDataFiles,
}

impl Candidate {
    const PROBE_ORDER: [Candidate; 3] = [
        Candidate::SameFolder,
        Candidate::DataSubfolder,
        Candidate::SharedDataFiles,
    ];

    pub fn describe(&self) -> &'static str {
        match self {
            Candidate::SameFolder => "same folder",
            Candidate::DataSubfolder => "data subfolder",
            Candidate::SharedDataFiles => "shared data folder",
        }
    }
}

/// An external file located in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Target exactly as written in the document
    pub target: String,
    /// Path within the source tree where the file was found
    pub tree_path: String,
    /// Which candidate matched
    pub candidate: Candidate,
}

/// Outcome of resolving every reference of one document
#[derive(Debug, Default)]
pub struct Resolution {
    pub found: Vec<ResolvedFile>,
    pub missing: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

// @struct: Resolves reference targets against a source tree
pub struct FileResolver<'a> {
    // @field: Tree to probe
    tree: &'a dyn TreeListing,
    // @field: Name of the per-folder data subfolder
    data_subfolder: String,
    // @field: Name of the corpus-wide shared data folder
    shared_folder: String,
}

impl<'a> FileResolver<'a> {
    // @creates: New resolver with the default folder layout
    pub fn new(tree: &'a dyn TreeListing) -> Self {
        Self::with_folders(tree, DEFAULT_DATA_SUBFOLDER, DEFAULT_SHARED_FOLDER)
    }

    // @creates: New resolver with explicit folder names
    pub fn with_folders(
        tree: &'a dyn TreeListing,
        data_subfolder: impl Into<String>,
        shared_folder: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            data_subfolder: data_subfolder.into(),
            shared_folder: shared_folder.into(),
        }
    }

    /// Probe the candidates in rank order for one target
    pub async fn resolve(
        &self,
        folder: &str,
        target: &str,
    ) -> Result<Option<ResolvedFile>, ListingError> {
        for candidate in Candidate::PROBE_ORDER {
            let tree_path = self.candidate_path(folder, target, candidate);
            let (parent, name) = split_tree_path(&tree_path);
            if self.tree.contains_file(parent, name).await? {
                debug!("Resolved '{target}' at {tree_path} ({})", candidate.describe());
                return Ok(Some(ResolvedFile {
                    target: target.to_string(),
                    tree_path,
                    candidate,
                }));
            }
        }
        Ok(None)
    }

    /// Resolve every distinct relative target, keeping first-seen order.
    /// Absolute targets are skipped; the rules already flag those.
    pub async fn resolve_all(
        &self,
        folder: &str,
        refs: &[FileReference],
    ) -> Result<Resolution, ListingError> {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for reference in refs {
            if references::is_absolute_path(&reference.target) {
                continue;
            }
            if !seen.insert(reference.target.clone()) {
                continue;
            }
            match self.resolve(folder, &reference.target).await? {
                Some(found) => resolution.found.push(found),
                None => resolution.missing.push(reference.target.clone()),
            }
        }

        Ok(resolution)
    }

    fn candidate_path(&self, folder: &str, target: &str, candidate: Candidate) -> String {
        match candidate {
            Candidate::SameFolder => join_tree_path(folder, target),
            Candidate::DataSubfolder => {
                join_tree_path(&join_tree_path(folder, &self.data_subfolder), target)
            }
            Candidate::SharedDataFiles => join_tree_path(&self.shared_folder, target),
        }
    }
}
