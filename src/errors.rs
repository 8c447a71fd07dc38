/*!
 * Error types for the inpvet application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when listing or fetching from a source tree
#[derive(Error, Debug)]
pub enum ListingError {
    /// Error when making a listing request fails
    #[error("Listing request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a listing response fails
    #[error("Failed to parse listing response: {0}")]
    ParseError(String),

    /// Error returned by the remote API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error while downloading file content
    #[error("Download failed for {path}: {message}")]
    DownloadFailed {
        /// Tree path of the file being fetched
        path: String,
        /// Underlying failure description
        message: String,
    },

    /// Error from a local filesystem operation
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration layer
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a source-tree listing or fetch
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
