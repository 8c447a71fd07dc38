/*!
 * Corpus curation pipeline.
 *
 * This module contains the end-to-end vetting flow for a corpus of input
 * decks: discover documents, read them, resolve their external files, run
 * the validation rules, stage what passes and write a run summary.
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::app_config::Config;
use crate::document::Document;
use crate::errors::ListingError;
use crate::file_utils::FileManager;
use crate::listing::{ListingCache, TreeListing, TreePath};
use crate::references;
use crate::resolver::{FileResolver, Resolution};
use crate::validation::{validate_document, Issue, IssueKind, ValidationReport};

/// Name of the run summary written to the output directory
pub const SUMMARY_FILE: &str = "summary.json";

/// Why a document was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    ReadError,
    MissingExternalFiles,
    ValidationFailed,
    CopyFailed,
}

/// An accepted document, staged together with its external files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedEntry {
    pub folder: String,
    pub filename: String,
    /// External file targets as written in the document
    pub external_files: Vec<String>,
    /// Where the staged copy of the document landed
    pub local_path: String,
}

/// A rejected document and the evidence behind the rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub folder: String,
    pub filename: String,
    pub reason: RejectReason,

    /// Unresolvable external file targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,

    /// Validation issues, for rule rejections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,

    /// Error text, for read and copy failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RejectedEntry {
    fn bare(location: &TreePath, reason: RejectReason) -> Self {
        Self {
            folder: location.folder.clone(),
            filename: location.name.clone(),
            reason,
            missing: None,
            issues: None,
            error: None,
        }
    }

    pub fn read_error(location: &TreePath, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::bare(location, RejectReason::ReadError)
        }
    }

    pub fn missing_externals(location: &TreePath, missing: Vec<String>) -> Self {
        Self {
            missing: Some(missing),
            ..Self::bare(location, RejectReason::MissingExternalFiles)
        }
    }

    pub fn failed_validation(location: &TreePath, issues: Vec<Issue>) -> Self {
        Self {
            issues: Some(issues),
            ..Self::bare(location, RejectReason::ValidationFailed)
        }
    }

    pub fn copy_failed(location: &TreePath, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::bare(location, RejectReason::CopyFailed)
        }
    }
}

/// Roll-up of one curation run
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CurationSummary {
    pub total_found: usize,
    pub valid: usize,
    pub invalid: usize,
    pub valid_files: Vec<AcceptedEntry>,
    pub invalid_files: Vec<RejectedEntry>,
}

impl CurationSummary {
    /// Load a summary written by a previous run
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let text = FileManager::read_to_string_lossy(&path)?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse summary: {:?}", path.as_ref()))
    }

    /// Write the summary into the output directory
    pub fn save(&self, out_dir: &std::path::Path) -> Result<PathBuf> {
        let path = out_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize summary")?;
        FileManager::write_to_file(&path, &json)?;
        Ok(path)
    }
}

/// Leniency gate between validation and acceptance
#[derive(Debug, Clone, Copy)]
pub struct AcceptancePolicy {
    max_minor_issues: usize,
}

impl AcceptancePolicy {
    pub fn new(max_minor_issues: usize) -> Self {
        Self { max_minor_issues }
    }

    /// A report passes when it is small and structurally sound: few issues
    /// in total, and none of them a missing required section
    pub fn accepts(&self, report: &ValidationReport) -> bool {
        report.issues.len() <= self.max_minor_issues
            && !report.has_kind(IssueKind::MissingSection)
    }
}

/// Outcome of vetting one document
enum Outcome {
    Accepted(AcceptedEntry),
    Rejected(RejectedEntry),
}

// @struct: Drives the curation pipeline over one source tree
pub struct Curator<'a> {
    // @field: Cached view of the corpus
    tree: ListingCache<'a>,
    // @field: Where accepted documents are staged
    out_dir: PathBuf,
    // @field: Run settings
    config: &'a Config,
}

impl<'a> Curator<'a> {
    // @creates: New curator over a source tree
    pub fn new(tree: &'a dyn TreeListing, out_dir: impl Into<PathBuf>, config: &'a Config) -> Self {
        Self {
            tree: ListingCache::new(tree),
            out_dir: out_dir.into(),
            config,
        }
    }

    /// Full run: discover documents, vet them, write the summary
    pub async fn run(&self) -> Result<CurationSummary> {
        FileManager::ensure_dir(&self.out_dir)?;

        let documents = self
            .tree
            .find_files(&self.config.corpus.extension)
            .await
            .map_err(|e| anyhow::anyhow!("Corpus discovery failed: {}", e))?;
        let total_found = documents.len();
        info!(
            "Found {} .{} documents in {}",
            total_found,
            self.config.corpus.extension,
            self.tree.describe()
        );

        // A document staged by an earlier run is not vetted again
        let (pending, skipped): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|location| !self.already_staged(location));
        if !skipped.is_empty() {
            info!("Skipping {} already staged documents", skipped.len());
        }

        let outcomes = self.vet_documents(pending).await;
        let summary = self.summarize(total_found, Vec::new(), Vec::new(), outcomes)?;
        Ok(summary)
    }

    /// Re-run only the documents a previous run rejected for missing
    /// external files, keeping everything already valid
    pub async fn reprocess_invalid(&self) -> Result<CurationSummary> {
        FileManager::ensure_dir(&self.out_dir)?;

        let previous = CurationSummary::load(self.out_dir.join(SUMMARY_FILE))
            .context("No previous summary to reprocess")?;

        let targets: Vec<TreePath> = previous
            .invalid_files
            .iter()
            .filter(|entry| entry.reason == RejectReason::MissingExternalFiles)
            .map(|entry| TreePath::new(entry.folder.clone(), entry.filename.clone()))
            .collect();
        info!(
            "Reprocessing {} documents previously missing external files",
            targets.len()
        );

        let kept_valid = previous.valid_files.clone();
        let kept_invalid: Vec<RejectedEntry> = previous
            .invalid_files
            .iter()
            .filter(|entry| entry.reason != RejectReason::MissingExternalFiles)
            .cloned()
            .collect();

        let outcomes = self.vet_documents(targets).await;
        let summary = self.summarize(previous.total_found, kept_valid, kept_invalid, outcomes)?;
        Ok(summary)
    }

    /// Vet a batch of documents concurrently, in stable input order
    async fn vet_documents(&self, documents: Vec<TreePath>) -> Vec<Outcome> {
        let workers = self.config.curation.workers.max(1);

        // Create a semaphore to limit concurrent documents
        let semaphore = Arc::new(Semaphore::new(workers));

        // Track progress
        let total = documents.len();
        let processed = Arc::new(AtomicUsize::new(0));

        let progress_bar = ProgressBar::new(total as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Vetting");

        // Process documents concurrently
        let results = stream::iter(documents.into_iter().enumerate())
            .map(|(index, location)| {
                let semaphore = semaphore.clone();
                let processed = processed.clone();
                let progress_bar = progress_bar.clone();

                async move {
                    // Acquire a permit from the semaphore
                    let _permit = semaphore.acquire().await.unwrap();

                    let outcome = self.process_document(&location).await;

                    processed.fetch_add(1, Ordering::SeqCst);
                    progress_bar.inc(1);

                    (index, outcome)
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        progress_bar.finish_with_message("Vetting complete");
        debug!("Processed {} documents", processed.load(Ordering::SeqCst));

        let (hits, misses, hit_rate) = self.tree.stats();
        debug!(
            "Listing cache: {} hits, {} misses ({:.0}% hit rate)",
            hits,
            misses,
            hit_rate * 100.0
        );

        // Sort results by index to maintain original order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, _)| *index);

        sorted_results
            .into_iter()
            .map(|(_, outcome)| outcome)
            .collect()
    }

    /// Read, resolve, validate and stage one document
    async fn process_document(&self, location: &TreePath) -> Outcome {
        debug!("Vetting {}", location.full());

        let text = match self.tree.fetch_text(&location.full()).await {
            Ok(text) => text,
            Err(e) => return Outcome::Rejected(RejectedEntry::read_error(location, e.to_string())),
        };

        let document = Document::parse(location.full(), location.folder.clone(), text);
        let file_refs = references::file_references(&document);

        let resolver = FileResolver::with_folders(
            &self.tree,
            self.config.corpus.data_subfolder.clone(),
            self.config.corpus.shared_data_folder.clone(),
        );
        let resolution = match resolver.resolve_all(&location.folder, &file_refs).await {
            Ok(resolution) => resolution,
            Err(e) => {
                return Outcome::Rejected(RejectedEntry::read_error(
                    location,
                    format!("external file probe failed: {e}"),
                ))
            }
        };

        // A deck that cannot take its data files along is unusable no
        // matter what the rules say
        if !resolution.is_complete() {
            return Outcome::Rejected(RejectedEntry::missing_externals(
                location,
                resolution.missing,
            ));
        }

        let report = validate_document(&document);
        let policy = AcceptancePolicy::new(self.config.curation.max_minor_issues);
        if !policy.accepts(&report) {
            return Outcome::Rejected(RejectedEntry::failed_validation(location, report.issues));
        }
        if !report.is_clean() {
            debug!(
                "Accepting {} with {} minor issue(s)",
                location.full(),
                report.issues.len()
            );
        }

        match self.stage(location, &resolution).await {
            Ok(entry) => Outcome::Accepted(entry),
            Err(e) => Outcome::Rejected(RejectedEntry::copy_failed(location, e.to_string())),
        }
    }

    /// Byte-copy the document and its external files into the output
    /// directory, preserving the folder layout. Files already staged are
    /// left untouched.
    async fn stage(&self, location: &TreePath, resolution: &Resolution) -> Result<AcceptedEntry, ListingError> {
        let folder_dir = self.out_dir.join(&location.folder);
        let doc_dest = folder_dir.join(&location.name);

        if !FileManager::file_exists(&doc_dest) {
            self.tree.fetch_file(&location.full(), &doc_dest).await?;
        }

        let mut external_files = Vec::new();
        for resolved in &resolution.found {
            // Staged next to the document under the target as written, so
            // the deck finds it by the same relative name
            let dest = folder_dir.join(&resolved.target);
            if !FileManager::file_exists(&dest) {
                self.tree.fetch_file(&resolved.tree_path, &dest).await?;
            }
            external_files.push(resolved.target.clone());
        }

        Ok(AcceptedEntry {
            folder: location.folder.clone(),
            filename: location.name.clone(),
            external_files,
            local_path: doc_dest.to_string_lossy().into_owned(),
        })
    }

    fn already_staged(&self, location: &TreePath) -> bool {
        let dest = self.out_dir.join(&location.folder).join(&location.name);
        FileManager::file_exists(dest)
    }

    fn summarize(
        &self,
        total_found: usize,
        kept_valid: Vec<AcceptedEntry>,
        kept_invalid: Vec<RejectedEntry>,
        outcomes: Vec<Outcome>,
    ) -> Result<CurationSummary> {
        let mut summary = CurationSummary {
            total_found,
            valid_files: kept_valid,
            invalid_files: kept_invalid,
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                Outcome::Accepted(entry) => summary.valid_files.push(entry),
                Outcome::Rejected(entry) => summary.invalid_files.push(entry),
            }
        }
        summary.valid = summary.valid_files.len();
        summary.invalid = summary.invalid_files.len();

        let path = summary.save(&self.out_dir)?;
        info!(
            "Curation finished: {} valid, {} invalid, summary at {:?}",
            summary.valid, summary.invalid, path
        );
        Ok(summary)
    }
}
