//! bundletool acquisition and invocation.
//!
//! Downloads the pinned bundletool release jar from GitHub on first use,
//! caches it on disk keyed by version, and builds the `java -jar` command
//! used by the exporter.

use crate::error::{DownloadError, ExportError};
use crate::http;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// bundletool release pinned for this step
pub const BUNDLETOOL_VERSION: &str = "0.15.0";

const BUNDLETOOL_BASE_URL: &str = "https://github.com/google/bundletool/releases/download";

/// Zip local-file-header magic; release jars are zip archives
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// A provisioned bundletool jar, ready to run through `java -jar`.
#[derive(Debug, Clone)]
pub struct Bundletool {
    jar_path: PathBuf,
}

impl Bundletool {
    /// Provision the given bundletool version under `cache_dir`.
    ///
    /// Downloads the release jar on first use and reuses the cached copy on
    /// every later run; a warm cache produces no network traffic.
    pub async fn provision(version: &str, cache_dir: &Path) -> Result<Self, DownloadError> {
        Self::provision_from(version, cache_dir, BUNDLETOOL_BASE_URL).await
    }

    /// Provision from an explicit release base URL.
    pub(crate) async fn provision_from(
        version: &str,
        cache_dir: &Path,
        base_url: &str,
    ) -> Result<Self, DownloadError> {
        let jar_name = format!("bundletool-all-{version}.jar");
        let jar_path = cache_dir.join(&jar_name);

        if jar_path.exists() {
            log::debug!("bundletool {} already cached at {:?}", version, jar_path);
            return Ok(Self { jar_path });
        }

        tokio::fs::create_dir_all(cache_dir)
            .await
            .map_err(|source| DownloadError::CacheWrite {
                path: cache_dir.to_path_buf(),
                source,
            })?;

        let url = format!("{base_url}/{version}/{jar_name}");
        let data = http::download(&url).await?;

        if !data.starts_with(ZIP_MAGIC) {
            return Err(DownloadError::InvalidArtifact { url });
        }

        write_atomic(&jar_path, &data)?;

        log::info!("✓ bundletool {} cached at {}", version, jar_path.display());
        Ok(Self { jar_path })
    }

    /// Path to the cached jar.
    pub fn jar_path(&self) -> &Path {
        &self.jar_path
    }

    /// Build the `java -jar <bundletool>` command the exporter appends
    /// its arguments to.
    pub fn command(&self) -> Result<Command, ExportError> {
        let java = which::which("java").map_err(|_| ExportError::JavaNotFound)?;
        log::debug!("Using java at {:?}", java);

        let mut cmd = Command::new(java);
        cmd.arg("-jar").arg(&self.jar_path);
        Ok(cmd)
    }
}

/// Default per-user cache root for downloaded tool jars.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("generate-universal-apk")
}

/// Writes the jar through a temp file in the same directory so a killed run
/// never leaves a truncated jar at the cache path.
fn write_atomic(jar_path: &Path, data: &[u8]) -> Result<(), DownloadError> {
    let cache_write = |source| DownloadError::CacheWrite {
        path: jar_path.to_path_buf(),
        source,
    };

    let dir = jar_path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(cache_write)?;
    tmp.write_all(data).map_err(cache_write)?;
    tmp.persist(jar_path)
        .map_err(|e| cache_write(e.error))
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 9 (discard) is never listening locally, so any fetch attempt fails.
    const DEAD_URL: &str = "http://127.0.0.1:9";

    #[tokio::test]
    async fn warm_cache_skips_the_network() {
        let cache = tempfile::tempdir().unwrap();
        let jar = cache.path().join("bundletool-all-0.15.0.jar");
        std::fs::write(&jar, b"PK\x03\x04cached").unwrap();

        let tool = Bundletool::provision_from("0.15.0", cache.path(), DEAD_URL)
            .await
            .unwrap();
        assert_eq!(tool.jar_path(), jar);
    }

    #[tokio::test]
    async fn cold_cache_with_unreachable_host_is_a_download_error() {
        let cache = tempfile::tempdir().unwrap();

        let err = Bundletool::provision_from("0.15.0", cache.path(), DEAD_URL)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Request { .. }));

        // Nothing half-written must land at the cache path.
        assert!(!cache.path().join("bundletool-all-0.15.0.jar").exists());
    }

    #[test]
    fn atomic_write_lands_complete_file() {
        let cache = tempfile::tempdir().unwrap();
        let jar = cache.path().join("bundletool-all-0.15.0.jar");

        write_atomic(&jar, b"PK\x03\x04payload").unwrap();
        assert_eq!(std::fs::read(&jar).unwrap(), b"PK\x03\x04payload");
    }
}
