//! Signing credential provisioning via the JDK `keytool`.
//!
//! Reuse-or-create policy: an existing keystore file always wins and its
//! contents are never validated. When generation fails (no JDK installed,
//! keytool exits non-zero) the provisioner degrades to an unsigned build
//! instead of aborting. That fallback is deliberate policy, not an
//! accident.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Default keystore file name, created next to the other build artifacts.
pub const DEFAULT_KEYSTORE_NAME: &str = "release.keystore";
/// Default key alias.
pub const DEFAULT_ALIAS: &str = "release";
/// Development-grade default password, shared by store and key.
///
/// Known weakness carried over for parity with the original tool: this is
/// a development signer, not a production one.
pub const DEFAULT_PASSWORD: &str = "123456";

const DEFAULT_DNAME: &str = "CN=aab2apk, OU=Dev, O=Dev, L=Dev, S=Dev, C=US";

const KEYTOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Descriptor of a usable signing credential.
#[derive(Debug, Clone)]
pub struct Keystore {
    /// Path to the keystore file
    pub path: PathBuf,
    /// Key alias inside the keystore
    pub alias: String,
    /// Keystore password
    pub store_pass: String,
    /// Key password
    pub key_pass: String,
}

/// Everything needed to locate or generate a keystore.
#[derive(Debug, Clone)]
pub struct KeystoreSpec {
    /// Where the keystore lives (or should be created)
    pub path: PathBuf,
    /// Key alias
    pub alias: String,
    /// Keystore password
    pub store_pass: String,
    /// Key password
    pub key_pass: String,
    /// X.500 distinguished name used when generating a new keystore
    pub dname: String,
}

impl KeystoreSpec {
    /// Spec with the development defaults, rooted in `work_dir`.
    pub fn with_defaults(work_dir: &Path) -> Self {
        Self {
            path: work_dir.join(DEFAULT_KEYSTORE_NAME),
            alias: DEFAULT_ALIAS.to_string(),
            store_pass: DEFAULT_PASSWORD.to_string(),
            key_pass: DEFAULT_PASSWORD.to_string(),
            dname: DEFAULT_DNAME.to_string(),
        }
    }

    fn descriptor(&self) -> Keystore {
        Keystore {
            path: self.path.clone(),
            alias: self.alias.clone(),
            store_pass: self.store_pass.clone(),
            key_pass: self.key_pass.clone(),
        }
    }
}

/// Returns a signing credential, generating one if necessary.
///
/// `None` means the build proceeds unsigned.
pub async fn ensure_keystore(spec: &KeystoreSpec) -> Option<Keystore> {
    if spec.path.is_file() {
        println!("✓ Found keystore: {}", spec.path.display());
        return Some(spec.descriptor());
    }

    println!("Creating keystore for signed APK...");
    match generate(spec).await {
        Ok(()) => {
            println!("✓ Keystore created: {}", spec.path.display());
            Some(spec.descriptor())
        }
        Err(e) => {
            log::warn!("{e}");
            println!("Falling back to unsigned APK (install a JDK for signing)");
            None
        }
    }
}

async fn generate(spec: &KeystoreSpec) -> Result<()> {
    let keytool = which::which("keytool").map_err(|e| Error::Credential {
        reason: format!("keytool not found in PATH: {e}"),
    })?;
    log::debug!("using keytool at {}", keytool.display());

    let child = Command::new(&keytool)
        .arg("-genkey")
        .arg("-v")
        .arg("-keystore")
        .arg(&spec.path)
        .arg("-alias")
        .arg(&spec.alias)
        .args(["-keyalg", "RSA", "-keysize", "2048", "-validity", "10000"])
        .arg("-storepass")
        .arg(&spec.store_pass)
        .arg("-keypass")
        .arg(&spec.key_pass)
        .arg("-dname")
        .arg(&spec.dname)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Credential {
            reason: format!("failed to run keytool: {e}"),
        })?;

    let output = match tokio::time::timeout(KEYTOOL_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(Error::Credential {
                reason: format!("failed to wait for keytool: {e}"),
            });
        }
        Err(_) => {
            return Err(Error::Credential {
                reason: format!(
                    "keytool timed out after {} seconds",
                    KEYTOOL_TIMEOUT.as_secs()
                ),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Credential {
            reason: format!(
                "keytool exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }
    if !spec.path.is_file() {
        return Err(Error::Credential {
            reason: format!("keytool did not create {}", spec.path.display()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_keystore_wins_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.keystore");
        tokio::fs::write(&path, b"opaque keystore bytes").await.unwrap();

        let spec = KeystoreSpec {
            path: path.clone(),
            alias: "custom-alias".to_string(),
            store_pass: "sekrit".to_string(),
            key_pass: "sekrit2".to_string(),
            dname: "CN=Ignored".to_string(),
        };
        let ks = ensure_keystore(&spec).await.expect("descriptor");

        // Descriptor mirrors the supplied fields; the file itself is untouched.
        assert_eq!(ks.path, path);
        assert_eq!(ks.alias, "custom-alias");
        assert_eq!(ks.store_pass, "sekrit");
        assert_eq!(ks.key_pass, "sekrit2");
        let content = tokio::fs::read(&path).await.unwrap();
        assert_eq!(content, b"opaque keystore bytes");
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_unsigned() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so keytool (if present at all)
        // cannot create the keystore.
        let spec = KeystoreSpec::with_defaults(&dir.path().join("no-such-subdir"));

        assert!(ensure_keystore(&spec).await.is_none());
    }
}
