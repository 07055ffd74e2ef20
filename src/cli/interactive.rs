//! Interactive conversion flow, driven by sequential prompts.
//!
//! Runs in the current directory: picks a bundle, walks through the signing
//! questions, converts, then asks for the final APK name. Defaults match
//! the automated build mode.

use crate::convert::keystore::{KeystoreSpec, DEFAULT_ALIAS, DEFAULT_KEYSTORE_NAME, DEFAULT_PASSWORD};
use crate::convert::{self, extract::Extractor, finalize, SigningChoice};
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Password, Select};
use std::path::{Path, PathBuf};

/// Runs the interactive flow to completion. Returns the process exit code.
///
/// `bundle_arg` is a bundle path given on the command line; when present it
/// replaces the directory scan (and a missing file is a fatal error).
pub async fn run(extractor: Extractor, bundle_arg: Option<PathBuf>) -> Result<i32> {
    let cwd = std::env::current_dir()?;

    let bundle = match bundle_arg {
        Some(path) if path.is_file() => path,
        Some(path) => return Err(Error::BundleNotFound(path)),
        None => pick_bundle(&cwd)?,
    };
    let stem = bundle
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    let container = cwd.join(format!("{stem}.apks"));

    let signing = signing_prompts(&cwd)?;

    let jar = convert::bundletool::ensure_bundletool(&cwd).await?;
    let ks = convert::provision_credential(&signing, &cwd).await;
    let universal =
        convert::build_and_extract(&jar, &bundle, &container, ks.as_ref(), &extractor, &cwd)
            .await?;

    let signed = ks.is_some();
    let default_name = finalize::default_output_name(&bundle, signed);
    let answer: String = Input::new()
        .with_prompt("Final APK name")
        .default(default_name)
        .interact_text()?;

    let final_path = finalize::finalize(&universal, &cwd, &answer, &[container]).await?;
    let status = if signed { "signed" } else { "unsigned" };
    println!("\n✓ APK ready: {} ({status})", final_path.display());
    Ok(0)
}

/// Picks the input bundle: the only `.aab` in the directory, or a selection
/// prompt when there are several.
fn pick_bundle(dir: &Path) -> Result<PathBuf> {
    let mut bundles: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("aab"))
        })
        .collect();
    bundles.sort();

    match bundles.len() {
        0 => Err(Error::BundleNotFound(dir.join("*.aab"))),
        1 => {
            let bundle = bundles.remove(0);
            println!("Only one .aab found, using {}", bundle.display());
            Ok(bundle)
        }
        _ => {
            let names: Vec<String> = bundles
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();
            let selection = Select::new()
                .with_prompt("Select the AAB to convert")
                .items(&names)
                .default(0)
                .interact()?;
            Ok(bundles.remove(selection))
        }
    }
}

/// Walks through the signing questions and returns the chosen policy.
///
/// Answering `skip` at the keystore path, or declining to create a missing
/// keystore, yields an unsigned build.
fn signing_prompts(dir: &Path) -> Result<SigningChoice> {
    println!("\nSigning setup (press Enter for defaults, answer \"skip\" for an unsigned APK)");

    let path_answer: String = Input::new()
        .with_prompt("Keystore path")
        .default(DEFAULT_KEYSTORE_NAME.to_string())
        .interact_text()?;
    let lowered = path_answer.to_lowercase();
    if lowered == "skip" || lowered == "s" {
        return Ok(SigningChoice::Skip);
    }
    let path = dir.join(&path_answer);

    if !path.is_file() {
        println!("Keystore not found at {}", path.display());
        let create = Confirm::new()
            .with_prompt("Create a new keystore?")
            .default(true)
            .interact()?;
        if !create {
            return Ok(SigningChoice::Skip);
        }
        let (alias, store_pass, key_pass) = credential_prompts()?;
        let dname = identity_prompts()?;
        return Ok(SigningChoice::Custom(KeystoreSpec {
            path,
            alias,
            store_pass,
            key_pass,
            dname,
        }));
    }

    // Existing keystore: only the access fields are needed; the file itself
    // is reused as-is.
    let (alias, store_pass, key_pass) = credential_prompts()?;
    Ok(SigningChoice::Custom(KeystoreSpec {
        path,
        alias,
        store_pass,
        key_pass,
        dname: String::new(),
    }))
}

fn credential_prompts() -> Result<(String, String, String)> {
    let alias: String = Input::new()
        .with_prompt("Key alias")
        .default(DEFAULT_ALIAS.to_string())
        .interact_text()?;
    let store_pass = password_prompt("Keystore password")?;
    let key_pass = password_prompt("Key password")?;
    Ok((alias, store_pass, key_pass))
}

fn password_prompt(prompt: &str) -> Result<String> {
    let answer = Password::new()
        .with_prompt(format!("{prompt} (empty for default)"))
        .allow_empty_password(true)
        .interact()?;
    if answer.is_empty() {
        Ok(DEFAULT_PASSWORD.to_string())
    } else {
        Ok(answer)
    }
}

fn identity_prompts() -> Result<String> {
    let field = |prompt: &str, default: &str| -> Result<String> {
        Ok(Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()?)
    };
    let common_name = field("Your name", "Test User")?;
    let org_unit = field("Organization unit", "Test Org")?;
    let org = field("Organization", "Test Company")?;
    let city = field("City", "Test City")?;
    let state = field("State", "Test State")?;
    let country = field("Country code (2 letters)", "US")?;
    Ok(format!(
        "CN={common_name}, OU={org_unit}, O={org}, L={city}, S={state}, C={country}"
    ))
}
