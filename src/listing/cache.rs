/*!
 * Folder-listing cache.
 *
 * Candidate probing lists the same folders over and over; every document
 * in a corpus probes the shared data folder. Caching listings keeps local
 * runs off the disk and remote runs inside API quotas.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;

use super::{ListEntry, TreeListing, TreePath};
use crate::errors::ListingError;

/// Caching wrapper around a source tree
#[derive(Debug)]
pub struct ListingCache<'a> {
    /// Wrapped tree
    inner: &'a dyn TreeListing,

    /// Folder listings keyed by folder path
    folders: Arc<RwLock<HashMap<String, Vec<ListEntry>>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl<'a> ListingCache<'a> {
    /// Create a new cache in front of a source tree
    pub fn new(inner: &'a dyn TreeListing) -> Self {
        Self {
            inner,
            folders: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of cached folder listings
    pub fn len(&self) -> usize {
        self.folders.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.folders.read().is_empty()
    }
}

#[async_trait]
impl TreeListing for ListingCache<'_> {
    async fn list_folder(&self, folder: &str) -> Result<Vec<ListEntry>, ListingError> {
        {
            let cache = self.folders.read();
            if let Some(entries) = cache.get(folder) {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Listing cache hit for '{}'", folder);
                return Ok(entries.clone());
            }
        }

        {
            let mut misses = self.misses.write();
            *misses += 1;
        }

        let entries = self.inner.list_folder(folder).await?;
        self.folders
            .write()
            .insert(folder.to_string(), entries.clone());

        debug!("Cached listing for '{}' ({} entries)", folder, entries.len());
        Ok(entries)
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ListingError> {
        self.inner.fetch_text(path).await
    }

    async fn fetch_file(&self, path: &str, dest: &Path) -> Result<(), ListingError> {
        self.inner.fetch_file(path, dest).await
    }

    async fn find_files(&self, extension: &str) -> Result<Vec<TreePath>, ListingError> {
        self.inner.find_files(extension).await
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
