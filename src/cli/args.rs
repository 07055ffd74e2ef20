//! Command line argument parsing.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Convert Android App Bundles into installable universal APKs
#[derive(Parser, Debug)]
#[command(
    name = "aab2apk",
    version,
    about = "Convert Android App Bundles (.aab) into installable universal APKs",
    long_about = "Converts an Android App Bundle into an installable APK by driving \
Google's bundletool (downloaded on first use), optionally signing the result \
with a keystore generated via the JDK keytool, and extracting the universal \
APK from the produced container.

Usage:
  aab2apk                                  # interactive mode in the current directory
  aab2apk build app-release.aab --name=myapp.apk

Build mode works in a 'build' folder on the desktop, asks no questions, and \
signs with an auto-generated development keystore (falling back to an \
unsigned APK when no JDK is available).

Exit code 0 = the APK exists at the reported path."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a bundle without prompts, using default signing
    Build {
        /// Path to the input .aab bundle
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,

        /// Final APK file name (default: <bundle>-signed.apk or
        /// <bundle>-unsigned.apk)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Directory to work and place the final APK in
        /// (default: a 'build' folder on the desktop)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },

    /// Anything unrecognized falls through to interactive mode
    #[command(external_subcommand)]
    Other(Vec<OsString>),
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_subcommand_parses_name_and_work_dir() {
        let args =
            Args::parse_from(["aab2apk", "build", "app.aab", "--name=demo.apk", "--work-dir", "/tmp/w"]);
        match args.command {
            Some(Command::Build { bundle, name, work_dir }) => {
                assert_eq!(bundle, PathBuf::from("app.aab"));
                assert_eq!(name.as_deref(), Some("demo.apk"));
                assert_eq!(work_dir, Some(PathBuf::from("/tmp/w")));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn no_arguments_selects_interactive_mode() {
        let args = Args::parse_from(["aab2apk"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn unknown_first_argument_falls_through() {
        let args = Args::parse_from(["aab2apk", "frobnicate"]);
        assert!(matches!(args.command, Some(Command::Other(_))));
    }
}
