use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Corpus layout settings
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Remote listing settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Curation run settings
    #[serde(default)]
    pub curation: CurationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Corpus layout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorpusConfig {
    // @field: Input file extension to collect
    #[serde(default = "default_extension")]
    pub extension: String,

    // @field: Per-folder data subfolder probed for external files
    #[serde(default = "default_data_subfolder")]
    pub data_subfolder: String,

    // @field: Corpus-wide shared data folder probed for external files
    #[serde(default = "default_shared_data_folder")]
    pub shared_data_folder: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            data_subfolder: default_data_subfolder(),
            shared_data_folder: default_shared_data_folder(),
        }
    }
}

/// Remote listing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Contents API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Raw download base URL
    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// Branch to read from
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Listing page size
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// Sleep between throttled retries, in seconds
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            branch: default_branch(),
            per_page: default_per_page(),
            cooldown_secs: default_cooldown_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Curation run configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurationConfig {
    /// Maximum number of documents processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// A document with at most this many issues, none of them a missing
    /// required section, is still accepted
    #[serde(default = "default_max_minor_issues")]
    pub max_minor_issues: usize,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_minor_issues: default_max_minor_issues(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_extension() -> String {
    "inp".to_string()
}

fn default_data_subfolder() -> String {
    "data".to_string()
}

fn default_shared_data_folder() -> String {
    "DataFiles".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_per_page() -> usize {
    100
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_workers() -> usize {
    4
}

fn default_max_minor_issues() -> usize {
    2
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.corpus.extension.trim().is_empty() {
            return Err(anyhow!("Corpus extension must not be empty"));
        }
        if self.remote.branch.trim().is_empty() {
            return Err(anyhow!("Remote branch must not be empty"));
        }
        if self.remote.per_page == 0 {
            return Err(anyhow!("Remote page size must be at least 1"));
        }
        if self.curation.workers == 0 {
            return Err(anyhow!("Worker count must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            corpus: CorpusConfig::default(),
            remote: RemoteConfig::default(),
            curation: CurationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
