/*!
 * Local source-tree backend, a plain folder on disk.
 */

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use walkdir::WalkDir;

use super::{EntryKind, ListEntry, TreeListing, TreePath};
use crate::errors::ListingError;

// @struct: Source tree rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalTree {
    // @field: Corpus root directory
    root: PathBuf,
}

impl LocalTree {
    // @creates: New local tree rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl TreeListing for LocalTree {
    async fn list_folder(&self, folder: &str) -> Result<Vec<ListEntry>, ListingError> {
        let dir = self.full_path(folder);
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(_) => return Ok(Vec::new()),
        };

        let mut entries = Vec::new();
        for entry in read_dir.flatten() {
            let kind = match entry.file_type() {
                Ok(t) if t.is_dir() => EntryKind::Dir,
                Ok(t) if t.is_file() => EntryKind::File,
                _ => continue,
            };
            entries.push(ListEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ListingError> {
        let bytes = fs::read(self.full_path(path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_file(&self, path: &str, dest: &Path) -> Result<(), ListingError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(self.full_path(path), dest)?;
        Ok(())
    }

    async fn find_files(&self, extension: &str) -> Result<Vec<TreePath>, ListingError> {
        let wanted = extension.to_lowercase();
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.root).into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase() == wanted)
                .unwrap_or(false);
            if !matches {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let folder = relative
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            found.push(TreePath { folder, name });
        }

        found.sort();
        Ok(found)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
