//! Fuchsia SDK assembly tool.
//!
//! Copies pre-built artifacts (headers, libraries, toolchains, kernel images,
//! debugging symbols, emulator binaries) out of a Fuchsia build tree into a
//! staging directory laid out per the SDK convention, then optionally
//! compresses the result into a tarball.
//!
//! Pipeline: parse flags → seed layout (create_layout.py, once per arch) →
//!           execute copy table → archive.

mod archive;
mod cli;
mod config;
mod copy;
mod layout;
mod table;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};

use config::{Config, Host};

/// Staging-directory root.
///
/// A user-supplied directory is kept at exit; an auto-created temporary one
/// is removed when this guard drops, on success and failure alike.
enum Staging {
    Keep(PathBuf),
    Temp(tempfile::TempDir),
}

impl Staging {
    fn path(&self) -> &Path {
        match self {
            Staging::Keep(dir) => dir,
            Staging::Temp(dir) => dir.path(),
        }
    }
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if !cli.root.exists() {
        cli::Cli::command()
            .print_help()
            .context("printing usage")?;
        bail!("Fuchsia root not found at \"{}\"", cli.root.display());
    }

    let staging = match &cli.out_dir {
        Some(dir) => {
            if !cli.dry_run {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            Staging::Keep(dir.clone())
        }
        None => Staging::Temp(
            tempfile::Builder::new()
                .prefix("fuchsia-sdk")
                .tempdir()
                .context("creating temporary staging directory")?,
        ),
    };

    let config = Config::new(&cli, staging.path().to_path_buf());
    let entries = table::build_table(&Host::detect());

    layout::create_layout(&config)?;
    copy::execute(&config, &entries)?;
    if config.archive {
        archive::create_archive(&config)?;
    }

    Ok(())
}
