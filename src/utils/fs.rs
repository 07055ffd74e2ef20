//! File system helpers for the conversion pipeline.

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolves the default build directory for automated runs: a `build`
/// folder on the user's desktop, created if missing.
pub fn desktop_build_dir() -> Result<PathBuf> {
    let desktop = dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or_else(|| Error::Finalize {
            reason: "could not determine a home directory for the build folder".to_string(),
        })?;
    let build_dir = desktop.join("build");
    if build_dir.is_dir() {
        log::debug!("using existing build directory: {}", build_dir.display());
    } else {
        std::fs::create_dir_all(&build_dir)?;
        println!("Created build directory: {}", build_dir.display());
    }
    Ok(build_dir)
}

/// Removes a file if it exists. Idempotent.
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Copies a regular file, creating parent directories of the destination
/// as necessary.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::BundleNotFound(from.to_path_buf()));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_file_if_exists_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        remove_file_if_exists(&path).await.unwrap();

        tokio::fs::write(&path, b"x").await.unwrap();
        remove_file_if_exists(&path).await.unwrap();
        assert!(!path.exists());
        remove_file_if_exists(&path).await.unwrap();
    }

    #[tokio::test]
    async fn copy_file_requires_regular_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.aab");
        let err = copy_file(&missing, &dir.path().join("out.aab"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BundleNotFound(_)));
    }
}
