//! The conversion pipeline: Fetch → Credential → Build → Extract → Finalize.
//!
//! Strictly sequential, no retries. Any stage failure aborts the run; only
//! credential provisioning recovers on its own (by degrading to an unsigned
//! build).

pub mod bundletool;
pub mod extract;
pub mod finalize;
pub mod keystore;

use crate::error::{Error, Result};
use crate::utils::fs as fs_utils;
use extract::Extractor;
use keystore::{Keystore, KeystoreSpec};
use std::path::{Path, PathBuf};

/// Name of the container entry that holds the universal APK.
pub const UNIVERSAL_APK: &str = "universal.apk";

/// How the pipeline obtains a signing credential.
#[derive(Debug, Clone)]
pub enum SigningChoice {
    /// Reuse-or-create `release.keystore` with the development defaults
    Auto,
    /// User-supplied keystore location and identity fields
    Custom(KeystoreSpec),
    /// Build unsigned
    Skip,
}

/// Configuration for one conversion run, threaded through every stage.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Input `.aab` bundle
    pub bundle: PathBuf,
    /// Final APK name; defaulted from the bundle name when `None`
    pub output_name: Option<String>,
    /// Directory holding the bundletool jar, keystore, intermediate
    /// container and final artifact
    pub work_dir: PathBuf,
    /// Signing policy
    pub signing: SigningChoice,
    /// Copy the bundle into the work dir first (automated build mode)
    pub copy_bundle: bool,
    /// Extraction mechanism, selected once at startup
    pub extractor: Extractor,
}

/// Resolves the signing choice into an optional credential descriptor.
pub async fn provision_credential(
    signing: &SigningChoice,
    work_dir: &Path,
) -> Option<Keystore> {
    match signing {
        SigningChoice::Skip => {
            println!("Building unsigned APK (not suitable for distribution)");
            None
        }
        SigningChoice::Auto => keystore::ensure_keystore(&KeystoreSpec::with_defaults(work_dir)).await,
        SigningChoice::Custom(spec) => keystore::ensure_keystore(spec).await,
    }
}

/// Runs the bundletool build and pulls `universal.apk` out of the produced
/// container. Returns the path of the extracted entry.
pub async fn build_and_extract(
    jar: &Path,
    bundle: &Path,
    container: &Path,
    keystore: Option<&Keystore>,
    extractor: &Extractor,
    work_dir: &Path,
) -> Result<PathBuf> {
    bundletool::build_apks(jar, bundle, container, keystore).await?;

    println!("Extracting {UNIVERSAL_APK}...");
    let universal = work_dir.join(UNIVERSAL_APK);
    // A leftover from a previous run must not be mistaken for this run's output.
    fs_utils::remove_file_if_exists(&universal).await?;
    extractor.extract(container, work_dir, Some(UNIVERSAL_APK)).await?;

    if !universal.is_file() {
        return Err(Error::Extract {
            reason: format!("{UNIVERSAL_APK} missing after extraction"),
        });
    }
    Ok(universal)
}

/// Runs the whole pipeline and returns the final artifact path.
pub async fn convert(options: &ConvertOptions) -> Result<PathBuf> {
    if !options.bundle.is_file() {
        return Err(Error::BundleNotFound(options.bundle.clone()));
    }
    tokio::fs::create_dir_all(&options.work_dir).await?;
    let work_dir = options.work_dir.as_path();

    // Staging a copy when the bundle already lives in the work dir would
    // copy the file onto itself (fs::copy truncates the destination first)
    // and later delete the user's original. Canonicalize the bundle itself,
    // not its parent: a bare relative path like `app.aab` has parent "".
    let staged = if options.copy_bundle {
        let file_name = options
            .bundle
            .file_name()
            .ok_or_else(|| Error::BundleNotFound(options.bundle.clone()))?;
        let staged = work_dir.join(file_name);
        let bundle_canonical = options.bundle.canonicalize()?;
        let same_file = staged
            .canonicalize()
            .is_ok_and(|target| target == bundle_canonical);
        if same_file {
            None
        } else {
            fs_utils::copy_file(&options.bundle, &staged).await?;
            Some(staged)
        }
    } else {
        None
    };
    let bundle = staged.clone().unwrap_or_else(|| options.bundle.clone());

    // Fetch
    let jar = bundletool::ensure_bundletool(work_dir).await?;

    // Credential
    let ks = provision_credential(&options.signing, work_dir).await;

    // Build + Extract
    let stem = options
        .bundle
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    let container = work_dir.join(format!("{stem}.apks"));
    let universal = build_and_extract(
        &jar,
        &bundle,
        &container,
        ks.as_ref(),
        &options.extractor,
        work_dir,
    )
    .await?;

    // Finalize
    let signed = ks.is_some();
    let output_name = options
        .output_name
        .clone()
        .unwrap_or_else(|| finalize::default_output_name(&options.bundle, signed));
    let mut cleanup = vec![container];
    if let Some(staged) = staged {
        cleanup.push(staged);
    }
    let final_path = finalize::finalize(&universal, work_dir, &output_name, &cleanup).await?;

    let status = if signed { "signed" } else { "unsigned" };
    println!("\n✓ APK ready: {} ({status})", final_path.display());
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_bundle_fails_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions {
            bundle: dir.path().join("missing.aab"),
            output_name: None,
            work_dir: dir.path().join("work"),
            signing: SigningChoice::Skip,
            copy_bundle: true,
            extractor: Extractor::BuiltinZip,
        };

        let err = convert(&options).await.unwrap_err();
        assert!(matches!(err, Error::BundleNotFound(_)));
        // Nothing was created for a run that never started.
        assert!(!dir.path().join("work").exists());
    }
}
