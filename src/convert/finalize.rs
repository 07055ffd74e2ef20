//! Final artifact placement and intermediate cleanup.

use crate::error::{Error, Result};
use crate::utils::fs as fs_utils;
use std::path::{Path, PathBuf};

/// Ensures a final name carries the `.apk` extension.
pub fn ensure_apk_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(".apk") {
        name.to_string()
    } else {
        format!("{name}.apk")
    }
}

/// Default output name derived from the bundle's base name, qualified by
/// signing status.
pub fn default_output_name(bundle: &Path, signed: bool) -> String {
    let base = bundle
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());
    let qualifier = if signed { "signed" } else { "unsigned" };
    format!("{base}-{qualifier}.apk")
}

/// Renames the extracted entry to its final name inside `work_dir`, then
/// deletes the listed intermediate files. Rename failure is fatal, with no
/// recovery.
pub async fn finalize(
    extracted: &Path,
    work_dir: &Path,
    output_name: &str,
    cleanup: &[PathBuf],
) -> Result<PathBuf> {
    let final_name = ensure_apk_extension(output_name);
    let final_path = work_dir.join(&final_name);

    if final_path.is_file() {
        println!("{final_name} already exists, overwriting...");
        fs_utils::remove_file_if_exists(&final_path).await?;
    }

    tokio::fs::rename(extracted, &final_path)
        .await
        .map_err(|e| Error::Finalize {
            reason: format!(
                "failed to rename {} to {}: {e}",
                extracted.display(),
                final_path.display()
            ),
        })?;

    for intermediate in cleanup {
        fs_utils::remove_file_if_exists(intermediate).await?;
    }

    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(ensure_apk_extension("demo"), "demo.apk");
        assert_eq!(ensure_apk_extension("demo.apk"), "demo.apk");
        assert_eq!(ensure_apk_extension("Demo.APK"), "Demo.APK");
        assert_eq!(ensure_apk_extension("v1.2"), "v1.2.apk");
    }

    #[test]
    fn default_name_carries_signing_qualifier() {
        let bundle = Path::new("/tmp/app-release.aab");
        assert_eq!(default_output_name(bundle, true), "app-release-signed.apk");
        assert_eq!(
            default_output_name(bundle, false),
            "app-release-unsigned.apk"
        );
    }

    #[tokio::test]
    async fn finalize_renames_overwrites_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let extracted = dir.path().join("universal.apk");
        let container = dir.path().join("app.apks");
        tokio::fs::write(&extracted, b"payload").await.unwrap();
        tokio::fs::write(&container, b"container").await.unwrap();
        tokio::fs::write(dir.path().join("demo.apk"), b"old").await.unwrap();

        let final_path = finalize(&extracted, dir.path(), "demo", &[container.clone()])
            .await
            .unwrap();

        assert_eq!(final_path, dir.path().join("demo.apk"));
        let content = tokio::fs::read(&final_path).await.unwrap();
        assert_eq!(content, b"payload");
        assert!(!extracted.exists());
        assert!(!container.exists());
    }

    #[tokio::test]
    async fn finalize_rename_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("universal.apk");
        let err = finalize(&missing, dir.path(), "demo.apk", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Finalize { .. }));
    }
}
