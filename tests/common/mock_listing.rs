/*!
 * Mock tree backend for testing listing consumers without a filesystem
 * or network. Folders and file contents are scripted up front; a shared
 * tracker records the calls made so tests can assert on probe behavior.
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use inpvet::errors::ListingError;
use inpvet::listing::{split_tree_path, EntryKind, ListEntry, TreeListing, TreePath};

/// Tracks calls made to a MockTree
#[derive(Debug, Default)]
pub struct ListingCallTracker {
    /// Number of list_folder calls
    pub list_calls: usize,
    /// Number of fetch_text and fetch_file calls
    pub fetch_calls: usize,
    /// Folders passed to list_folder, in call order
    pub listed_folders: Vec<String>,
    /// When set, the next fetch_text call fails and the flag resets
    pub fail_next_fetch: bool,
}

/// An in-memory tree with scripted contents
#[derive(Debug, Default)]
pub struct MockTree {
    files: HashMap<String, String>,
    tracker: Arc<Mutex<ListingCallTracker>>,
}

impl MockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a file at a tree path like "proj/model.inp"
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Get a handle on the call tracker
    pub fn tracker(&self) -> Arc<Mutex<ListingCallTracker>> {
        self.tracker.clone()
    }

    /// Make the next fetch_text call fail
    pub fn fail_next_fetch(&self) {
        self.tracker.lock().unwrap().fail_next_fetch = true;
    }

    fn content(&self, path: &str) -> Result<&String, ListingError> {
        self.files.get(path).ok_or_else(|| ListingError::DownloadFailed {
            path: path.to_string(),
            message: "not in mock tree".to_string(),
        })
    }
}

#[async_trait]
impl TreeListing for MockTree {
    async fn list_folder(&self, folder: &str) -> Result<Vec<ListEntry>, ListingError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.list_calls += 1;
            tracker.listed_folders.push(folder.to_string());
        }

        let prefix = format!("{folder}/");
        let mut entries: Vec<ListEntry> = Vec::new();
        for path in self.files.keys() {
            let (dir, name) = split_tree_path(path);
            if dir == folder {
                entries.push(ListEntry {
                    name: name.to_string(),
                    kind: EntryKind::File,
                });
                continue;
            }

            // A deeper path contributes its first component as a child dir
            let below = if folder.is_empty() {
                if dir.is_empty() { None } else { Some(dir) }
            } else {
                dir.strip_prefix(&prefix)
            };
            if let Some(rest) = below {
                if let Some(child) = rest.split('/').next() {
                    let already = entries
                        .iter()
                        .any(|e| e.kind == EntryKind::Dir && e.name == child);
                    if !already {
                        entries.push(ListEntry {
                            name: child.to_string(),
                            kind: EntryKind::Dir,
                        });
                    }
                }
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ListingError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.fetch_calls += 1;
            if tracker.fail_next_fetch {
                tracker.fail_next_fetch = false;
                return Err(ListingError::RequestFailed(
                    "scripted fetch failure".to_string(),
                ));
            }
        }
        Ok(self.content(path)?.clone())
    }

    async fn fetch_file(&self, path: &str, dest: &Path) -> Result<(), ListingError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.fetch_calls += 1;
        }
        let content = self.content(path)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, content)?;
        Ok(())
    }

    async fn find_files(&self, extension: &str) -> Result<Vec<TreePath>, ListingError> {
        let suffix = format!(".{}", extension.to_lowercase());
        let mut found: Vec<TreePath> = self
            .files
            .keys()
            .filter(|path| path.to_lowercase().ends_with(&suffix))
            .map(|path| {
                let (folder, name) = split_tree_path(path);
                TreePath::new(folder, name)
            })
            .collect();
        found.sort();
        Ok(found)
    }

    fn describe(&self) -> String {
        format!("mock tree ({} files)", self.files.len())
    }
}
