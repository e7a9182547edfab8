//! Universal APK export through bundletool.
//!
//! Runs `bundletool build-apks --mode=universal` against the input bundle,
//! then pulls `universal.apk` out of the resulting `.apks` archive into the
//! deploy directory.

use crate::bundletool::Bundletool;
use crate::error::ExportError;
use crate::keystore::KeystoreConfig;
use std::path::{Path, PathBuf};

/// Entry name bundletool uses for the universal APK inside the apks archive
const UNIVERSAL_APK_ENTRY: &str = "universal.apk";

/// Converts the bundle to a universal APK and returns its absolute path.
///
/// When a keystore is configured it is materialized first and the signing
/// arguments are appended to the bundletool invocation; otherwise the APK is
/// left unsigned. Subprocess output is surfaced to the operator log.
pub async fn export_universal_apk(
    tool: &Bundletool,
    aab_path: &Path,
    deploy_dir: &Path,
    keystore: Option<&KeystoreConfig>,
) -> Result<PathBuf, ExportError> {
    let scratch = tempfile::tempdir()?;
    let apks_path = scratch.path().join("universal.apks");

    let signing = match keystore {
        Some(ks) => {
            let local = ks.resolve(scratch.path()).await?;
            Some(signing_args(&local, ks))
        }
        None => {
            log::info!("No keystore configured, exporting an unsigned APK");
            None
        }
    };

    let mut cmd = tool.command()?;
    cmd.arg("build-apks")
        .arg(format!("--bundle={}", aab_path.display()))
        .arg(format!("--output={}", apks_path.display()))
        .arg("--mode=universal");
    if let Some(args) = &signing {
        cmd.args(args);
    }

    log::info!("Generating universal apks from {}", aab_path.display());
    let output = cmd.output().await.map_err(ExportError::Spawn)?;

    if !output.stdout.is_empty() {
        log::info!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
    }
    if !output.stderr.is_empty() {
        log::warn!("{}", String::from_utf8_lossy(&output.stderr).trim_end());
    }

    if !output.status.success() {
        return Err(ExportError::CommandFailed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tokio::fs::create_dir_all(deploy_dir).await?;
    let apk_path = deploy_dir.join(universal_apk_name(aab_path));
    extract_universal_apk(&apks_path, &apk_path).await?;

    let apk_path = tokio::fs::canonicalize(&apk_path).await?;
    log::info!("✓ Universal APK written to {}", apk_path.display());
    Ok(apk_path)
}

/// `app-release.aab` lands as `app-release-universal.apk`.
fn universal_apk_name(aab_path: &Path) -> String {
    let stem = aab_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bundle");
    format!("{stem}-universal.apk")
}

/// bundletool signing flags; both passwords use the `pass:` scheme.
fn signing_args(keystore_path: &Path, ks: &KeystoreConfig) -> Vec<String> {
    vec![
        format!("--ks={}", keystore_path.display()),
        format!("--ks-pass=pass:{}", ks.keystore_password()),
        format!("--ks-key-alias={}", ks.key_alias()),
        format!("--key-pass=pass:{}", ks.key_password()),
    ]
}

/// Pulls `universal.apk` out of the apks archive into `dest`.
///
/// The archive is a plain zip; extraction is blocking work and runs off the
/// async runtime.
async fn extract_universal_apk(apks_path: &Path, dest: &Path) -> Result<(), ExportError> {
    let apks = apks_path.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<(), ExportError> {
        let file = std::fs::File::open(&apks)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut entry = match archive.by_name(UNIVERSAL_APK_ENTRY) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ExportError::MissingUniversalApk { archive: apks });
            }
            Err(e) => return Err(e.into()),
        };

        let mut out = std::fs::File::create(&dest)?;
        std::io::copy(&mut entry, &mut out)?;
        Ok(())
    })
    .await
    .map_err(|e| ExportError::Io(std::io::Error::other(e)))?
}
