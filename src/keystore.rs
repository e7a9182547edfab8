//! Signing keystore configuration and materialization.
//!
//! The keystore location arrives as a step input that may be a local path, a
//! `file://` URL, or a remote `http(s)://` URL. Remote keystores are
//! downloaded into the export scratch directory before bundletool runs.

use crate::error::ExportError;
use crate::http;
use std::path::{Path, PathBuf};
use url::Url;

/// Signing parameters for the universal APK.
///
/// Constructed only when every signing input is present, so downstream code
/// never sees a partially-filled signing setup.
#[derive(Debug, Clone)]
pub struct KeystoreConfig {
    location: String,
    keystore_password: String,
    key_alias: String,
    key_password: String,
}

impl KeystoreConfig {
    /// Builds the signing configuration from the four raw step inputs.
    ///
    /// Returns `None` if any field is empty; signing is all-or-nothing.
    pub fn from_fields(
        location: &str,
        keystore_password: &str,
        key_alias: &str,
        key_password: &str,
    ) -> Option<Self> {
        if location.is_empty()
            || keystore_password.is_empty()
            || key_alias.is_empty()
            || key_password.is_empty()
        {
            return None;
        }

        Some(Self {
            location: location.to_string(),
            keystore_password: keystore_password.to_string(),
            key_alias: key_alias.to_string(),
            key_password: key_password.to_string(),
        })
    }

    /// Keystore location as configured, a local path or URL.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Password of the keystore itself.
    pub fn keystore_password(&self) -> &str {
        &self.keystore_password
    }

    /// Alias of the signing key inside the keystore.
    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    /// Password of the signing key.
    pub fn key_password(&self) -> &str {
        &self.key_password
    }

    /// Materializes the configured location to a local file.
    ///
    /// Remote keystores are downloaded into `workdir`; local locations are
    /// checked for existence and passed through.
    pub async fn resolve(&self, workdir: &Path) -> Result<PathBuf, ExportError> {
        match Url::parse(&self.location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                self.fetch_remote(&url, workdir).await
            }
            Ok(url) if url.scheme() == "file" => {
                let path = url.to_file_path().map_err(|()| self.error("not a valid file URL"))?;
                self.require_exists(path)
            }
            // Bare paths don't parse as URLs; treat anything else as local.
            _ => self.require_exists(PathBuf::from(&self.location)),
        }
    }

    async fn fetch_remote(&self, url: &Url, workdir: &Path) -> Result<PathBuf, ExportError> {
        log::info!("Fetching signing keystore from {}", url);

        let data = http::download(url.as_str())
            .await
            .map_err(|e| self.error(&e.to_string()))?;

        let file_name = url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .unwrap_or("keystore.jks");

        let path = workdir.join(file_name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| self.error(&e.to_string()))?;
        Ok(path)
    }

    fn require_exists(&self, path: PathBuf) -> Result<PathBuf, ExportError> {
        if path.is_file() {
            Ok(path)
        } else {
            Err(self.error("file does not exist"))
        }
    }

    fn error(&self, reason: &str) -> ExportError {
        ExportError::Keystore {
            location: self.location.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_four_fields_build_a_config() {
        let ks = KeystoreConfig::from_fields("/tmp/release.jks", "storepass", "release", "keypass");
        let ks = ks.unwrap();
        assert_eq!(ks.location(), "/tmp/release.jks");
        assert_eq!(ks.key_alias(), "release");
    }

    #[test]
    fn any_empty_field_means_no_signing() {
        let cases = [
            ("", "storepass", "release", "keypass"),
            ("/tmp/release.jks", "", "release", "keypass"),
            ("/tmp/release.jks", "storepass", "", "keypass"),
            ("/tmp/release.jks", "storepass", "release", ""),
        ];
        for (location, store_pw, alias, key_pw) in cases {
            assert!(KeystoreConfig::from_fields(location, store_pw, alias, key_pw).is_none());
        }
    }

    #[tokio::test]
    async fn local_path_resolves_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let jks = dir.path().join("release.jks");
        std::fs::write(&jks, b"keystore").unwrap();

        let ks = KeystoreConfig::from_fields(jks.to_str().unwrap(), "pw", "alias", "pw").unwrap();
        let resolved = ks.resolve(dir.path()).await.unwrap();
        assert_eq!(resolved, jks);
    }

    #[tokio::test]
    async fn file_url_resolves_to_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let jks = dir.path().join("release.jks");
        std::fs::write(&jks, b"keystore").unwrap();

        let url = Url::from_file_path(&jks).unwrap();
        let ks = KeystoreConfig::from_fields(url.as_str(), "pw", "alias", "pw").unwrap();
        let resolved = ks.resolve(dir.path()).await.unwrap();
        assert_eq!(resolved, jks);
    }

    #[tokio::test]
    async fn missing_local_keystore_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ks = KeystoreConfig::from_fields("/nonexistent/release.jks", "pw", "alias", "pw").unwrap();

        let err = ks.resolve(dir.path()).await.unwrap_err();
        assert!(matches!(err, ExportError::Keystore { .. }));
    }

    #[tokio::test]
    async fn unreachable_remote_keystore_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ks =
            KeystoreConfig::from_fields("http://127.0.0.1:9/release.jks", "pw", "alias", "pw")
                .unwrap();

        let err = ks.resolve(dir.path()).await.unwrap_err();
        assert!(matches!(err, ExportError::Keystore { .. }));
    }
}
