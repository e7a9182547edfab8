//! Universal APK generation step binary.
//!
//! Loads the step configuration from the environment, provisions bundletool,
//! exports the universal APK, and publishes its path for downstream steps.

use std::process;

#[tokio::main]
async fn main() {
    // Operator-facing log; info level unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match generate_universal_apk::cli::run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
