//! Error types for the AAB-to-APK conversion pipeline.
//!
//! Each pipeline stage has its own error variant so a failure always names
//! the stage that produced it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input bundle does not exist or is not a regular file
    #[error("bundle not found: {0}")]
    BundleNotFound(PathBuf),

    /// Downloading the bundletool artifact failed
    #[error("fetch failed for {url}: {reason}")]
    Fetch {
        /// URL that was being fetched
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// Keystore generation failed.
    ///
    /// Recoverable: the provisioner degrades to an unsigned build instead
    /// of aborting the run.
    #[error("credential setup failed: {reason}")]
    Credential {
        /// Reason for the failure
        reason: String,
    },

    /// bundletool invocation failed
    #[error("build failed: {reason}")]
    Build {
        /// Reason for the failure
        reason: String,
    },

    /// Archive extraction failed
    #[error("extract failed: {reason}")]
    Extract {
        /// Reason for the failure
        reason: String,
    },

    /// Placing the final artifact failed
    #[error("finalize failed: {reason}")]
    Finalize {
        /// Reason for the failure
        reason: String,
    },

    /// Interactive prompt failed
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO errors outside any specific stage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The pipeline stage this error belongs to, for reporting.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::BundleNotFound(_) => "input",
            Error::Fetch { .. } => "fetch",
            Error::Credential { .. } => "credential",
            Error::Build { .. } => "build",
            Error::Extract { .. } => "extract",
            Error::Finalize { .. } => "finalize",
            Error::Prompt(_) => "prompt",
            Error::Io(_) => "io",
        }
    }
}
