//! Staging-layout initialization via the external layout tool.
//!
//! `scripts/sdk/create_layout.py` reads an SDK manifest and seeds the staging
//! directory with the base layout. It runs once per architecture; the second
//! run merges on top of the first with `--overlay` instead of replacing it.

use anyhow::{Context, Result, bail};
use std::process::Command;

use crate::config::Config;
use crate::table::{ARM_BUILD_DIR, X64_BUILD_DIR};

/// Manifest name, looked up under `<build dir>/sdk-manifests/`.
const MANIFEST: &str = "garnet";

/// Seed the staging directory with the base SDK skeleton for both
/// architectures. Failure of either invocation aborts the run with the
/// tool's captured output.
pub fn create_layout(config: &Config) -> Result<()> {
    let tool = config.root.join("scripts/sdk/create_layout.py");

    for (idx, build_dir) in [X64_BUILD_DIR, ARM_BUILD_DIR].into_iter().enumerate() {
        let manifest = config.root.join(build_dir).join("sdk-manifests").join(MANIFEST);

        let mut cmd = Command::new(&tool);
        cmd.arg("--manifest")
            .arg(&manifest)
            .arg("--output")
            .arg(&config.staging);
        if idx > 0 {
            cmd.arg("--overlay");
        }

        if config.verbose || config.dry_run {
            println!(
                "create_layout {} --manifest {} --output {}{}",
                tool.display(),
                manifest.display(),
                config.staging.display(),
                if idx > 0 { " --overlay" } else { "" },
            );
        }
        if config.dry_run {
            continue;
        }

        let output = cmd
            .output()
            .with_context(|| format!("running {}", tool.display()))?;
        if !output.status.success() {
            bail!(
                "create_layout.py failed ({}):\n{}{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            );
        }
    }

    Ok(())
}
