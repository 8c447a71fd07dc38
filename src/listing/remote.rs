/*!
 * Remote source-tree backend over a repository contents API.
 *
 * Folder listings go through the JSON contents endpoint, page by page.
 * File payloads come from the raw download host. Rate limiting is handled
 * with a fixed cooldown: a throttled page sleeps and retries the same
 * request, as many times as it takes.
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{join_tree_path, EntryKind, ListEntry, TreeListing, TreePath};
use crate::errors::ListingError;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_PER_PAGE: usize = 100;
const DEFAULT_COOLDOWN_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("inpvet/", env!("CARGO_PKG_VERSION"));

// @trait: Injectable sleep, so cooldown handling is testable without waiting
#[async_trait]
pub trait Pacer: Send + Sync + std::fmt::Debug {
    async fn wait(&self, duration: Duration);
}

// @struct: Production pacer backed by the tokio timer
#[derive(Debug, Default, Clone)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of requesting one listing page
#[derive(Debug)]
enum ListingPage {
    /// Entries of this page
    Entries(Vec<ListEntry>),
    /// Rate limited, retry the same page after a cooldown
    Throttled,
    /// Folder absent or not listable
    Absent,
}

/// Raw entry shape of the contents API
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

// @struct: Source tree reached through a contents API
#[derive(Debug)]
pub struct RemoteTree {
    // @field: Repository as "owner/name"
    repo: String,
    // @field: Contents API base URL
    api_base: String,
    // @field: Raw download base URL
    raw_base: String,
    // @field: Branch to read from
    branch: String,
    // @field: Listing page size
    per_page: usize,
    // @field: Sleep between throttled retries
    cooldown: Duration,
    // @field: HTTP client for API requests
    client: Client,
    // @field: Sleep implementation
    pacer: Arc<dyn Pacer>,
}

impl RemoteTree {
    // @creates: New remote tree with default hosts and pacing
    pub fn new(repo: impl Into<String>) -> Self {
        Self::with_config(
            repo,
            DEFAULT_API_BASE,
            DEFAULT_RAW_BASE,
            DEFAULT_BRANCH,
            DEFAULT_PER_PAGE,
            DEFAULT_COOLDOWN_SECS,
            DEFAULT_TIMEOUT_SECS,
        )
    }

    // @creates: New remote tree with explicit hosts, branch and pacing
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        repo: impl Into<String>,
        api_base: &str,
        raw_base: &str,
        branch: &str,
        per_page: usize,
        cooldown_secs: u64,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            repo: repo.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
            branch: branch.to_string(),
            per_page: per_page.max(1),
            cooldown: Duration::from_secs(cooldown_secs),
            client,
            pacer: Arc::new(TokioPacer),
        }
    }

    /// Replace the pacer, mainly for tests
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    fn contents_url(&self, folder: &str, page: usize) -> Result<Url, ListingError> {
        let base = if folder.is_empty() {
            format!("{}/repos/{}/contents", self.api_base, self.repo)
        } else {
            format!("{}/repos/{}/contents/{}", self.api_base, self.repo, folder)
        };
        let mut url =
            Url::parse(&base).map_err(|e| ListingError::ParseError(format!("{base}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("ref", &self.branch)
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn raw_url(&self, path: &str) -> Result<Url, ListingError> {
        let base = format!(
            "{}/{}/{}/{}",
            self.raw_base, self.repo, self.branch, path
        );
        Url::parse(&base).map_err(|e| ListingError::ParseError(format!("{base}: {e}")))
    }

    async fn fetch_page(&self, folder: &str, page: usize) -> ListingPage {
        let url = match self.contents_url(folder, page) {
            Ok(url) => url,
            Err(e) => {
                warn!("Bad listing URL for '{folder}': {e}");
                return ListingPage::Absent;
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Listing request for '{folder}' failed: {e}");
                return ListingPage::Absent;
            }
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return ListingPage::Throttled;
        }
        if !status.is_success() {
            debug!("Listing '{folder}' page {page}: HTTP {status}");
            return ListingPage::Absent;
        }

        match response.text().await {
            Ok(body) => parse_listing_body(&body),
            Err(e) => {
                warn!("Listing body for '{folder}' unreadable: {e}");
                ListingPage::Absent
            }
        }
    }

    async fn download(&self, path: &str) -> Result<Bytes, ListingError> {
        let url = self.raw_url(path)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ListingError::RequestFailed(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::ApiError {
                status_code: status.as_u16(),
                message: format!("downloading {path}"),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| ListingError::DownloadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TreeListing for RemoteTree {
    async fn list_folder(&self, folder: &str) -> Result<Vec<ListEntry>, ListingError> {
        let entries = drain_pages(
            |page| self.fetch_page(folder, page),
            self.per_page,
            self.cooldown,
            self.pacer.as_ref(),
        )
        .await;
        debug!("Listed {} entries under '{}'", entries.len(), folder);
        Ok(entries)
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ListingError> {
        let bytes = self.download(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_file(&self, path: &str, dest: &std::path::Path) -> Result<(), ListingError> {
        let bytes = self.download(path).await?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, &bytes)?;
        Ok(())
    }

    async fn find_files(&self, extension: &str) -> Result<Vec<TreePath>, ListingError> {
        let mut pending = vec![String::new()];
        let mut found = Vec::new();

        while let Some(folder) = pending.pop() {
            for entry in self.list_folder(&folder).await? {
                match entry.kind {
                    EntryKind::File if matches_extension(&entry.name, extension) => {
                        found.push(TreePath::new(folder.clone(), entry.name));
                    }
                    EntryKind::Dir => pending.push(join_tree_path(&folder, &entry.name)),
                    EntryKind::File => {}
                }
            }
        }

        found.sort();
        Ok(found)
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.repo, self.branch)
    }
}

fn matches_extension(name: &str, extension: &str) -> bool {
    let suffix = format!(".{}", extension.to_lowercase());
    name.to_lowercase().ends_with(&suffix)
}

/// A folder listing is a JSON array; any other shape (a file object, an
/// error payload) means the path is not a listable folder.
fn parse_listing_body(body: &str) -> ListingPage {
    match serde_json::from_str::<Vec<RawEntry>>(body) {
        Ok(raw) => ListingPage::Entries(
            raw.into_iter()
                .filter_map(|entry| {
                    let kind = match entry.kind.as_str() {
                        "file" => EntryKind::File,
                        "dir" => EntryKind::Dir,
                        _ => return None,
                    };
                    Some(ListEntry {
                        name: entry.name,
                        kind,
                    })
                })
                .collect(),
        ),
        Err(_) => ListingPage::Absent,
    }
}

/// Drain a paginated listing. A short page ends the walk; a throttled page
/// sleeps the cooldown and retries the same page number.
async fn drain_pages<F, Fut>(
    mut fetch: F,
    per_page: usize,
    cooldown: Duration,
    pacer: &dyn Pacer,
) -> Vec<ListEntry>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = ListingPage>,
{
    let mut entries = Vec::new();
    let mut page = 1;

    loop {
        match fetch(page).await {
            ListingPage::Throttled => {
                warn!("Rate limited, cooling down for {}s", cooldown.as_secs());
                pacer.wait(cooldown).await;
            }
            ListingPage::Absent => break,
            ListingPage::Entries(batch) => {
                let short = batch.len() < per_page;
                entries.extend(batch);
                if short {
                    break;
                }
                page += 1;
            }
        }
    }

    entries
}
