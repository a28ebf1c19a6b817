//! Command-line interface definitions for makesdk.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Fuchsia SDK assembly tool.
///
/// Creates a Fuchsia SDK containing the selected features from a release-mode
/// build tree and places it into a tarball.
#[derive(Parser)]
#[command(name = "makesdk", version, about)]
pub struct Cli {
    /// Path to the Fuchsia source tree root.
    pub root: PathBuf,

    /// Whether to archive the output.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub archive: bool,

    /// Name of the archive.
    #[arg(long, default_value = "fuchsia-sdk.tgz")]
    pub output: PathBuf,

    /// Staging directory (default: a fresh temporary directory, removed on exit).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Include the toolchain.
    #[arg(
        long,
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub toolchain: bool,

    /// Include toolchain libraries in the SDK. Typically used when --toolchain is false.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub toolchain_lib: bool,

    /// Include the sysroot.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub sysroot: bool,

    /// Include kernel images.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub kernel_img: bool,

    /// Include kernel objects with debug symbols.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub kernel_dbg: bool,

    /// Include bootdata.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub bootdata: bool,

    /// Include the QEMU binary directory.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub qemu: bool,

    /// Include additional tools.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub tools: bool,

    /// Include the C media client library.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub media: bool,

    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Dry run - print what would happen but don't actually do it.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
