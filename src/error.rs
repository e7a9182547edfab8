//! Error types for the universal APK step.
//!
//! Every failure category is terminal: errors propagate to `main`, are printed
//! once, and the process exits with code 1. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for step operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Top-level error for the whole step run
#[derive(Error, Debug)]
pub enum StepError {
    /// Step input validation errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// bundletool provisioning errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Universal APK export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Result publication errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Step input errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required step input is absent or empty
    #[error("required input `{input}` is missing or empty")]
    MissingInput {
        /// Input (environment variable) name
        input: &'static str,
    },
}

/// Tool and keystore download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The HTTP request itself failed
    #[error("request for {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying transport error
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: reqwest::StatusCode,
    },

    /// The downloaded payload is not a usable jar archive
    #[error("artifact downloaded from {url} is not a valid jar archive")]
    InvalidArtifact {
        /// Requested URL
        url: String,
    },

    /// Writing the artifact into the cache failed
    #[error("failed to write {path}: {source}")]
    CacheWrite {
        /// Destination cache path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Universal APK export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// No java executable available to run the bundletool jar
    #[error("java executable not found in PATH")]
    JavaNotFound,

    /// bundletool could not be spawned
    #[error("failed to run bundletool: {0}")]
    Spawn(std::io::Error),

    /// bundletool ran but exited non-zero
    #[error("bundletool exited with code {code:?}: {stderr}")]
    CommandFailed {
        /// Subprocess exit code, if any
        code: Option<i32>,
        /// Captured stderr tail
        stderr: String,
    },

    /// The apks archive bundletool produced has no universal APK entry
    #[error("no universal.apk entry found in {archive}")]
    MissingUniversalApk {
        /// Path to the .apks archive that was scanned
        archive: PathBuf,
    },

    /// The signing keystore could not be materialized to a local file
    #[error("keystore {location} could not be resolved: {reason}")]
    Keystore {
        /// Keystore location as configured (path or URL)
        location: String,
        /// Human-readable failure reason
        reason: String,
    },

    /// Reading the apks archive failed
    #[error("apks archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// File system errors during export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result publication errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// The host pipeline's export tool is not installed
    #[error("envman not found in PATH, cannot export {key}")]
    ToolUnavailable {
        /// Environment key that was being exported
        key: String,
    },

    /// envman could not be spawned
    #[error("failed to run envman: {0}")]
    Spawn(std::io::Error),

    /// envman ran but exited non-zero
    #[error("envman exited with code {code:?} while exporting {key}")]
    CommandFailed {
        /// Environment key that was being exported
        key: String,
        /// Subprocess exit code, if any
        code: Option<i32>,
    },
}
