//! Archive extraction capability, selected once at startup.
//!
//! The `.apks` container is an ordinary zip archive. On Unix the platform
//! `unzip` binary is preferred when present; everywhere else (and as the
//! Unix fallback) the pure-Rust `zip` crate does the work. Existing files
//! at the destination are always force-overwritten.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

const UNZIP_TIMEOUT: Duration = Duration::from_secs(120);

/// Mechanism used to extract zip containers.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Drives the platform `unzip` binary at the given path
    UnzipCommand(PathBuf),
    /// In-process extraction via the `zip` crate
    BuiltinZip,
}

impl Extractor {
    /// Picks the extraction mechanism for this platform.
    #[cfg(windows)]
    pub fn detect() -> Self {
        Extractor::BuiltinZip
    }

    /// Picks the extraction mechanism for this platform.
    #[cfg(not(windows))]
    pub fn detect() -> Self {
        match which::which("unzip") {
            Ok(path) => {
                log::debug!("using unzip at {}", path.display());
                Extractor::UnzipCommand(path)
            }
            Err(e) => {
                log::debug!("unzip not found ({e}), using built-in extraction");
                Extractor::BuiltinZip
            }
        }
    }

    /// Extracts `entry` (or the whole archive when `None`) from `container`
    /// into `dest_dir`, overwriting existing files.
    pub async fn extract(
        &self,
        container: &Path,
        dest_dir: &Path,
        entry: Option<&str>,
    ) -> Result<()> {
        match self {
            Extractor::UnzipCommand(unzip) => {
                extract_with_unzip(unzip, container, dest_dir, entry).await
            }
            Extractor::BuiltinZip => extract_builtin(container, dest_dir, entry).await,
        }
    }
}

async fn extract_with_unzip(
    unzip: &Path,
    container: &Path,
    dest_dir: &Path,
    entry: Option<&str>,
) -> Result<()> {
    let mut cmd = Command::new(unzip);
    cmd.arg("-o").arg(container);
    if let Some(name) = entry {
        cmd.arg(name);
    }
    cmd.arg("-d").arg(dest_dir);
    cmd.stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| Error::Extract {
        reason: format!("failed to run unzip: {e}"),
    })?;

    let output = match tokio::time::timeout(UNZIP_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(Error::Extract {
                reason: format!("failed to wait for unzip: {e}"),
            });
        }
        Err(_) => {
            return Err(Error::Extract {
                reason: format!("unzip timed out after {} seconds", UNZIP_TIMEOUT.as_secs()),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Extract {
            reason: format!("unzip exited with {}: {}", output.status, stderr.trim()),
        });
    }
    Ok(())
}

async fn extract_builtin(container: &Path, dest_dir: &Path, entry: Option<&str>) -> Result<()> {
    let container = container.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();
    let entry = entry.map(str::to_string);

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::open(&container).map_err(|e| Error::Extract {
            reason: format!("cannot open {}: {e}", container.display()),
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::Extract {
            reason: format!("corrupt container {}: {e}", container.display()),
        })?;

        match entry {
            Some(name) => {
                let mut member = archive.by_name(&name).map_err(|e| Error::Extract {
                    reason: format!("entry {name} not found in {}: {e}", container.display()),
                })?;
                let out_path = dest_dir.join(&name);
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                // File::create truncates: force-overwrite semantics
                let mut out = std::fs::File::create(&out_path)?;
                std::io::copy(&mut member, &mut out)?;
            }
            None => {
                archive.extract(&dest_dir).map_err(|e| Error::Extract {
                    reason: format!("failed to extract {}: {e}", container.display()),
                })?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::Extract {
        reason: format!("extraction task panicked: {e}"),
    })?
}
