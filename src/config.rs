//! Run configuration and host identification.
//!
//! The CLI flags are resolved once into an immutable [`Config`] that is passed
//! explicitly to every component — nothing downstream reads flag state from
//! globals.

use std::path::PathBuf;

use crate::cli::Cli;

/// Feature switches gating path-table entries.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Feature {
    Sysroot,
    Toolchain,
    ToolchainLibs,
    KernelImg,
    KernelDbg,
    Bootdata,
    Qemu,
    Tools,
    Media,
}

/// The resolved feature switches, one per CLI flag.
#[derive(Clone, Debug)]
pub struct Features {
    pub sysroot: bool,
    pub toolchain: bool,
    pub toolchain_lib: bool,
    pub kernel_img: bool,
    pub kernel_dbg: bool,
    pub bootdata: bool,
    pub qemu: bool,
    pub tools: bool,
    pub media: bool,
}

impl Default for Features {
    /// Flag defaults: everything on except the toolchain itself.
    fn default() -> Self {
        Features {
            sysroot: true,
            toolchain: false,
            toolchain_lib: true,
            kernel_img: true,
            kernel_dbg: true,
            bootdata: true,
            qemu: true,
            tools: true,
            media: true,
        }
    }
}

impl Features {
    /// Whether entries gated by `feature` should be executed.
    pub fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Sysroot => self.sysroot,
            Feature::Toolchain => self.toolchain,
            Feature::ToolchainLibs => self.toolchain_lib,
            Feature::KernelImg => self.kernel_img,
            Feature::KernelDbg => self.kernel_dbg,
            Feature::Bootdata => self.bootdata,
            Feature::Qemu => self.qemu,
            Feature::Tools => self.tools,
            Feature::Media => self.media,
        }
    }
}

/// Normalized host OS/CPU identifiers used in `buildtools/<os>-<cpu>/` paths.
pub struct Host {
    pub os: String,
    pub cpu: String,
}

impl Host {
    /// Identify the running host.
    pub fn detect() -> Self {
        Host::from_raw(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust's platform names onto the buildtools naming scheme.
    fn from_raw(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "mac",
            other => other,
        };
        let cpu = match arch {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            other => other,
        };
        Host {
            os: os.to_string(),
            cpu: cpu.to_string(),
        }
    }
}

/// Immutable run configuration, built once from the parsed CLI.
pub struct Config {
    /// Fuchsia source tree root. All table source paths resolve against this.
    pub root: PathBuf,
    /// Staging directory root. All table destination paths resolve against this.
    pub staging: PathBuf,
    pub archive: bool,
    pub output: PathBuf,
    pub features: Features,
    pub verbose: bool,
    pub dry_run: bool,
}

impl Config {
    pub fn new(cli: &Cli, staging: PathBuf) -> Self {
        Config {
            root: cli.root.clone(),
            staging,
            archive: cli.archive,
            output: cli.output.clone(),
            features: Features {
                sysroot: cli.sysroot,
                toolchain: cli.toolchain,
                toolchain_lib: cli.toolchain_lib,
                kernel_img: cli.kernel_img,
                kernel_dbg: cli.kernel_dbg,
                bootdata: cli.bootdata,
                qemu: cli.qemu,
                tools: cli.tools,
                media: cli.media,
            },
            verbose: cli.verbose,
            dry_run: cli.dry_run,
        }
    }

    /// Whether entries gated by `feature` should be executed.
    pub fn enabled(&self, feature: Feature) -> bool {
        self.features.enabled(feature)
    }
}
