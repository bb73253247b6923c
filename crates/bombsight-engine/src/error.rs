//! Error types for the batch driver.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode of a batch run, from configuration loading to writing one match's
//! output file.

use std::path::PathBuf;

/// Top-level error for the batch driver.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` and the per-match workers can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: bombsight_core::config::ConfigError,
    },

    /// A replay could not be opened or decoded.
    #[error("feed error: {source}")]
    Feed {
        /// The underlying feed error.
        #[from]
        source: bombsight_core::feed::FeedError,
    },

    /// A match scan ended with an error.
    #[error("scan error: {source}")]
    Scan {
        /// The underlying scan error.
        #[from]
        source: bombsight_core::scanner::ScanError,
    },

    /// Reading or writing delimited output failed.
    #[error("CSV error: {source}")]
    Csv {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },

    /// A filesystem operation failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The input directory does not exist.
    #[error("input directory not found: {}", path.display())]
    MissingInput {
        /// The path that was given.
        path: PathBuf,
    },

    /// Files being merged do not share the same header.
    #[error("header of {} does not match the first file", path.display())]
    HeaderMismatch {
        /// The file whose header differs.
        path: PathBuf,
    },

    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },
}
