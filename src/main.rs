//! aab2apk - Convert Android App Bundles into installable universal APKs.
//!
//! This binary drives bundletool and keytool to turn a `.aab` bundle into
//! a signed (or unsigned) universal APK, with proper error reporting.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match aab2apk::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
