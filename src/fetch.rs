/*!
 * Repository acquisition.
 *
 * Curating straight from a hosted repository starts with a shallow clone
 * into a temporary directory. The checkout lives as long as the returned
 * handle, then cleans up after itself.
 */

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

const CLONE_TIMEOUT_SECS: u64 = 300;

// @struct: A shallow checkout that is removed when dropped
pub struct ClonedRepo {
    // @field: Temp directory owning the checkout
    _dir: TempDir,
    // @field: Root of the cloned tree
    root: PathBuf,
}

impl ClonedRepo {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Shallow-clone a repository into a fresh temporary directory
pub async fn clone_repo(url: &str) -> Result<ClonedRepo> {
    let dir = TempDir::new().context("Failed to create temporary clone directory")?;
    let target = dir.path().join(repo_dir_name(url));

    info!("Cloning {} (depth 1)", url);

    // Add timeout to prevent hanging on unreachable remotes
    let clone_future = Command::new("git")
        .args([
            "clone",
            "--depth",
            "1",
            url,
            target.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(CLONE_TIMEOUT_SECS);
    let output = tokio::select! {
        result = clone_future => {
            result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    anyhow!("git executable not found, install git or use remote mode")
                } else {
                    anyhow!("Failed to execute git clone: {}", e)
                }
            })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("git clone timed out after {} seconds", CLONE_TIMEOUT_SECS));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("git clone of {} failed: {}", url, stderr.trim()));
    }

    debug!("Clone finished at {:?}", target);
    Ok(ClonedRepo { _dir: dir, root: target })
}

/// Last path segment of the URL, without a trailing `.git`
fn repo_dir_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let name = segment.trim_end_matches(".git");
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}
