//! Universal APK generation step.
//!
//! Converts an Android App Bundle into a universal APK with Google's
//! bundletool, optionally signing it with a configured keystore, and exports
//! the resulting path for downstream CI steps.
//!
//! It can be used both as a CLI step and as a library dependency.

pub mod bundletool;
pub mod cli;
pub mod config;
pub mod envman;
pub mod error;
pub mod exporter;
pub mod http;
pub mod keystore;

// Re-export commonly used types
pub use error::{ConfigError, DownloadError, ExportError, PublishError, Result, StepError};
