//! Step configuration assembled from environment-backed inputs.

use crate::cli::Args;
use crate::error::ConfigError;
use crate::keystore::KeystoreConfig;
use std::path::PathBuf;

/// Resolved, immutable configuration for a single step run.
#[derive(Debug, Clone)]
pub struct StepConfig {
    aab_path: PathBuf,
    deploy_dir: PathBuf,
    keystore: Option<KeystoreConfig>,
}

impl StepConfig {
    /// Validates the raw inputs and builds the run configuration.
    ///
    /// `aab_path` is the only mandatory input; it is checked here, before any
    /// network or subprocess work starts. The keystore decision is atomic:
    /// either all four signing inputs are present or the run is unsigned.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.aab_path.is_empty() {
            return Err(ConfigError::MissingInput { input: "aab_path" });
        }

        let deploy_dir = if args.deploy_dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&args.deploy_dir)
        };

        let keystore = KeystoreConfig::from_fields(
            &args.keystore_url,
            &args.keystore_password,
            &args.key_alias,
            &args.private_key_password,
        );

        Ok(Self {
            aab_path: PathBuf::from(&args.aab_path),
            deploy_dir,
            keystore,
        })
    }

    /// Path of the input Android App Bundle.
    pub fn aab_path(&self) -> &PathBuf {
        &self.aab_path
    }

    /// Directory the universal APK is written into.
    pub fn deploy_dir(&self) -> &PathBuf {
        &self.deploy_dir
    }

    /// Signing configuration, if the run is a signed one.
    pub fn keystore(&self) -> Option<&KeystoreConfig> {
        self.keystore.as_ref()
    }

    /// Echoes the resolved configuration to the operator log for audit.
    ///
    /// Secret inputs are masked.
    pub fn log_summary(&self) {
        log::info!("Configs:");
        log::info!("- aab_path: {}", self.aab_path.display());
        log::info!("- deploy_dir: {}", self.deploy_dir.display());
        match &self.keystore {
            Some(ks) => {
                log::info!("- keystore_url: {}", ks.location());
                log::info!("- keystore_password: {}", mask(ks.keystore_password()));
                log::info!("- key_alias: {}", ks.key_alias());
                log::info!("- private_key_password: {}", mask(ks.key_password()));
            }
            None => log::info!("- keystore: not configured, the APK will be unsigned"),
        }
    }
}

/// Secrets never reach the log in the clear.
fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            aab_path: "app-release.aab".to_string(),
            deploy_dir: String::new(),
            keystore_url: String::new(),
            keystore_password: String::new(),
            key_alias: String::new(),
            private_key_password: String::new(),
        }
    }

    #[test]
    fn missing_aab_path_is_a_config_error() {
        let mut args = args();
        args.aab_path = String::new();

        let err = StepConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput { input: "aab_path" }));
    }

    #[test]
    fn empty_deploy_dir_defaults_to_current_dir() {
        let config = StepConfig::from_args(&args()).unwrap();
        assert_eq!(config.deploy_dir(), &PathBuf::from("."));
    }

    #[test]
    fn full_keystore_inputs_enable_signing() {
        let mut args = args();
        args.keystore_url = "https://vault.example.com/release.jks".to_string();
        args.keystore_password = "storepass".to_string();
        args.key_alias = "release".to_string();
        args.private_key_password = "keypass".to_string();

        let config = StepConfig::from_args(&args).unwrap();
        assert!(config.keystore().is_some());
    }

    #[test]
    fn partial_keystore_inputs_fall_back_to_unsigned() {
        let mut args = args();
        args.keystore_url = "https://vault.example.com/release.jks".to_string();
        args.key_alias = "release".to_string();

        let config = StepConfig::from_args(&args).unwrap();
        assert!(config.keystore().is_none());
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask("hunter2"), "***");
        assert_eq!(mask(""), "");
    }
}
