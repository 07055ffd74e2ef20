//! bundletool acquisition and invocation.
//!
//! The versioned jar is fetched from the GitHub release on first use and
//! reused from the work directory afterwards (presence is the only cache
//! key). The build step shells out to `java -jar bundletool.jar build-apks`
//! with stdout/stderr inherited so bundletool's own progress stays visible.

use crate::convert::keystore::Keystore;
use crate::error::{Error, Result};
use crate::utils::{fs as fs_utils, http};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Pinned bundletool artifact name.
pub const BUNDLETOOL_JAR_NAME: &str = "bundletool-all-1.18.1.jar";
/// Release URL for the pinned artifact. Redirects to a CDN.
pub const BUNDLETOOL_RELEASE_URL: &str =
    "https://github.com/google/bundletool/releases/latest/download/bundletool-all-1.18.1.jar";

const BUILD_TIMEOUT: Duration = Duration::from_secs(600);

/// Ensures the bundletool jar is present in `work_dir`, downloading it if
/// missing. Returns the jar path.
pub async fn ensure_bundletool(work_dir: &Path) -> Result<PathBuf> {
    let jar = work_dir.join(BUNDLETOOL_JAR_NAME);
    if jar.is_file() {
        println!("✓ Found {BUNDLETOOL_JAR_NAME}");
        return Ok(jar);
    }

    println!("Downloading bundletool to {}...", work_dir.display());
    http::download(BUNDLETOOL_RELEASE_URL, &jar).await?;
    println!("✓ bundletool downloaded");
    Ok(jar)
}

/// Builds the `java` argument vector for a `build-apks` invocation.
///
/// Signing flags are present exactly when a keystore descriptor is given.
pub fn build_apks_args(
    jar: &Path,
    bundle: &Path,
    output: &Path,
    keystore: Option<&Keystore>,
) -> Vec<OsString> {
    fn flag(name: &str, value: impl AsRef<std::ffi::OsStr>) -> OsString {
        let mut arg = OsString::from(name);
        arg.push(value);
        arg
    }

    let mut args = vec![
        OsString::from("-jar"),
        jar.as_os_str().to_os_string(),
        OsString::from("build-apks"),
        flag("--bundle=", bundle),
        flag("--output=", output),
        OsString::from("--mode=universal"),
    ];

    if let Some(ks) = keystore {
        args.push(flag("--ks=", &ks.path));
        args.push(flag("--ks-pass=", format!("pass:{}", ks.store_pass)));
        args.push(flag("--ks-key-alias=", &ks.alias));
        args.push(flag("--key-pass=", format!("pass:{}", ks.key_pass)));
    }

    args
}

/// Runs bundletool to produce the `.apks` container at `output`.
pub async fn build_apks(
    jar: &Path,
    bundle: &Path,
    output: &Path,
    keystore: Option<&Keystore>,
) -> Result<()> {
    let java = which::which("java").map_err(|e| Error::Build {
        reason: format!("java not found in PATH ({e}); bundletool needs a Java runtime"),
    })?;

    // Stale container from an earlier run would confuse extraction.
    fs_utils::remove_file_if_exists(output).await?;

    let args = build_apks_args(jar, bundle, output, keystore);
    match keystore {
        Some(_) => println!("Building signed APKS from {}...", bundle.display()),
        None => println!("Building unsigned APKS from {}...", bundle.display()),
    }

    let mut child = Command::new(&java)
        .args(&args)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Build {
            reason: format!("failed to run java: {e}"),
        })?;

    let status = match tokio::time::timeout(BUILD_TIMEOUT, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(Error::Build {
                reason: format!("failed to wait for bundletool: {e}"),
            });
        }
        Err(_) => {
            return Err(Error::Build {
                reason: format!(
                    "bundletool timed out after {} seconds",
                    BUILD_TIMEOUT.as_secs()
                ),
            });
        }
    };

    if !status.success() {
        return Err(Error::Build {
            reason: format!("bundletool exited with {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_as_strings(keystore: Option<&Keystore>) -> Vec<String> {
        build_apks_args(
            Path::new("/work/bundletool.jar"),
            Path::new("/work/app.aab"),
            Path::new("/work/app.apks"),
            keystore,
        )
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
    }

    #[test]
    fn unsigned_build_has_no_signing_flags() {
        let args = args_as_strings(None);
        assert_eq!(
            args,
            vec![
                "-jar",
                "/work/bundletool.jar",
                "build-apks",
                "--bundle=/work/app.aab",
                "--output=/work/app.apks",
                "--mode=universal",
            ]
        );
        assert!(!args.iter().any(|a| a.starts_with("--ks")));
    }

    #[test]
    fn signed_build_carries_all_four_signing_flags() {
        let ks = Keystore {
            path: PathBuf::from("/work/release.keystore"),
            alias: "release".to_string(),
            store_pass: "123456".to_string(),
            key_pass: "654321".to_string(),
        };
        let args = args_as_strings(Some(&ks));
        assert!(args.contains(&"--ks=/work/release.keystore".to_string()));
        assert!(args.contains(&"--ks-pass=pass:123456".to_string()));
        assert!(args.contains(&"--ks-key-alias=release".to_string()));
        assert!(args.contains(&"--key-pass=pass:654321".to_string()));
    }
}
