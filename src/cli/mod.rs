//! Command line interface: automated build mode plus the interactive
//! fall-through.

mod args;
mod interactive;

pub use args::{Args, Command};

use crate::convert::{convert, extract::Extractor, ConvertOptions, SigningChoice};
use crate::error::Result;
use crate::utils::fs as fs_utils;

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let extractor = Extractor::detect();

    match args.command {
        Some(Command::Build {
            bundle,
            name,
            work_dir,
        }) => {
            let work_dir = match work_dir {
                Some(dir) => dir,
                None => fs_utils::desktop_build_dir()?,
            };
            let options = ConvertOptions {
                bundle,
                output_name: name,
                work_dir,
                signing: SigningChoice::Auto,
                copy_bundle: true,
                extractor,
            };
            convert(&options).await?;
            Ok(0)
        }
        Some(Command::Other(argv)) => {
            // Unknown first argument falls through to interactive mode and
            // is taken as the bundle path.
            let bundle = argv.first().map(std::path::PathBuf::from);
            if let Some(path) = &bundle {
                log::debug!("treating {} as the bundle path", path.display());
            }
            interactive::run(extractor, bundle).await
        }
        None => interactive::run(extractor, None).await,
    }
}
