/*!
 * Source-tree listing backends.
 *
 * This module abstracts over where a corpus lives:
 * - Local: a folder on disk (a checkout or a fresh clone)
 * - Remote: a repository reached through a contents API, no checkout
 *
 * The resolver and the curator only speak this interface, so both corpus
 * forms run through the same pipeline.
 */

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::errors::ListingError;

/// What a folder entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Location of a file within a source tree, folders separated by `/`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreePath {
    /// Folder relative to the tree root, empty at the root
    pub folder: String,
    /// File name
    pub name: String,
}

impl TreePath {
    pub fn new(folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
        }
    }

    /// Full path from the tree root
    pub fn full(&self) -> String {
        join_tree_path(&self.folder, &self.name)
    }
}

/// Join a folder and a child path, keeping root-level paths clean
pub fn join_tree_path(folder: &str, child: &str) -> String {
    if folder.is_empty() {
        child.to_string()
    } else {
        format!("{folder}/{child}")
    }
}

/// Split a tree path into (parent folder, file name)
pub fn split_tree_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

/// Common interface for all source-tree backends
///
/// Absence is not an error: listing a folder that does not exist yields an
/// empty list, so a failed candidate probe reads the same everywhere.
/// Fetch failures are errors; the caller decides what a lost file means.
#[async_trait]
pub trait TreeListing: Send + Sync + Debug {
    /// List the immediate entries of a folder
    async fn list_folder(&self, folder: &str) -> Result<Vec<ListEntry>, ListingError>;

    /// Read a file as text, decoding tolerantly (invalid bytes replaced)
    async fn fetch_text(&self, path: &str) -> Result<String, ListingError>;

    /// Byte-copy a file from the tree to a local destination, creating
    /// parent directories as needed
    async fn fetch_file(&self, path: &str, dest: &Path) -> Result<(), ListingError>;

    /// Find every file with the given extension (case-insensitive), sorted
    async fn find_files(&self, extension: &str) -> Result<Vec<TreePath>, ListingError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Whether `folder` directly contains a file named `name`
    async fn contains_file(&self, folder: &str, name: &str) -> Result<bool, ListingError> {
        let entries = self.list_folder(folder).await?;
        Ok(entries
            .iter()
            .any(|e| e.kind == EntryKind::File && e.name == name))
    }
}

pub mod cache;
pub mod local;
pub mod remote;

// Re-export main types
pub use cache::ListingCache;
pub use local::LocalTree;
pub use remote::{Pacer, RemoteTree, TokioPacer};
