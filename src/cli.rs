//! Command line surface and step control flow.
//!
//! Step inputs arrive as environment variables injected by the CI platform;
//! each one is also exposed as a long flag for local runs. Required-input
//! validation happens in [`StepConfig::from_args`] rather than at the clap
//! level so every failure exits with code 1.

use crate::bundletool::{self, Bundletool, BUNDLETOOL_VERSION};
use crate::config::StepConfig;
use crate::error::Result;
use crate::{envman, exporter};
use clap::Parser;

/// Generates a universal APK from an Android App Bundle
#[derive(Parser, Debug)]
#[command(
    name = "generate-universal-apk",
    version,
    about = "Generates a universal APK from an Android App Bundle with bundletool",
    long_about = "Downloads a pinned bundletool release, converts the given .aab into a \
universal APK, optionally signs it with the configured keystore, and exports the \
resulting path as APK_PATH for downstream pipeline steps.

Exit code 0 = the APK exists at the exported path."
)]
pub struct Args {
    /// Path to the Android App Bundle to convert
    #[arg(long, env = "aab_path", value_name = "PATH", default_value = "")]
    pub aab_path: String,

    /// Directory the universal APK is written into
    #[arg(long, env = "BITRISE_DEPLOY_DIR", value_name = "DIR", default_value = "")]
    pub deploy_dir: String,

    /// Keystore location, a local path or remote URL
    #[arg(
        long,
        env = "keystore_url",
        value_name = "LOCATION",
        default_value = "",
        hide_env_values = true
    )]
    pub keystore_url: String,

    /// Password of the keystore
    #[arg(
        long,
        env = "keystore_password",
        value_name = "PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub keystore_password: String,

    /// Alias of the signing key inside the keystore
    #[arg(long, env = "key_alias", value_name = "ALIAS", default_value = "")]
    pub key_alias: String,

    /// Password of the signing key
    #[arg(
        long,
        env = "private_key_password",
        value_name = "PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub private_key_password: String,
}

/// Runs the whole step: config, provision, export, publish.
pub async fn run() -> Result<()> {
    let args = Args::parse();
    let config = StepConfig::from_args(&args)?;
    config.log_summary();

    let tool = Bundletool::provision(BUNDLETOOL_VERSION, &bundletool::default_cache_dir()).await?;
    log::info!("bundletool ready at {}", tool.jar_path().display());

    let apk_path = exporter::export_universal_apk(
        &tool,
        config.aab_path(),
        config.deploy_dir(),
        config.keystore(),
    )
    .await?;

    envman::publish("APK_PATH", &apk_path).await?;

    log::info!("✓ APK exported to {}", apk_path.display());
    Ok(())
}
