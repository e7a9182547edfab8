//! Publishes the produced APK path to downstream pipeline steps.
//!
//! Bitrise steps hand values to later steps through the `envman` CLI; the
//! step cannot mutate the parent shell's environment itself.

use crate::error::PublishError;
use std::path::Path;

/// Exports `key=value` through the host pipeline's envman tool.
///
/// A missing envman is fatal: without it the result cannot reach downstream
/// steps and the run has not accomplished anything.
pub async fn publish(key: &str, value: &Path) -> Result<(), PublishError> {
    let envman = which::which("envman").map_err(|_| PublishError::ToolUnavailable {
        key: key.to_string(),
    })?;
    publish_with(&envman, key, value).await
}

pub(crate) async fn publish_with(tool: &Path, key: &str, value: &Path) -> Result<(), PublishError> {
    let status = tokio::process::Command::new(tool)
        .arg("add")
        .arg("--key")
        .arg(key)
        .arg("--value")
        .arg(value)
        .status()
        .await
        .map_err(PublishError::Spawn)?;

    if !status.success() {
        return Err(PublishError::CommandFailed {
            key: key.to_string(),
            code: status.code(),
        });
    }

    log::debug!("Exported {} for downstream steps", key);
    Ok(())
}
