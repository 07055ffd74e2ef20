//! aab2apk - Convert Android App Bundles into installable universal APKs.
//!
//! Pure orchestration around three external collaborators: Google's
//! bundletool (fetched from its release URL on first use), the JDK
//! `keytool` for signing credentials, and a platform zip extractor. The
//! pipeline is five sequential stages (Fetch, Credential, Build, Extract,
//! Finalize) with no retries; only credential provisioning recovers from
//! failure (by degrading to an unsigned build).
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod convert;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use convert::{convert, ConvertOptions, SigningChoice};
pub use error::{Error, Result};
