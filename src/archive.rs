//! Staging-directory compression into a gzipped tarball.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;

use crate::config::Config;

/// Pack the whole staging directory into `config.output`.
///
/// Members are rooted at `.` so the archive unpacks in place, matching
/// `tar -C <staging> .`.
pub fn create_archive(config: &Config) -> Result<()> {
    if config.verbose || config.dry_run {
        println!(
            "Archiving {} to {}",
            config.staging.display(),
            config.output.display()
        );
    }
    if config.dry_run {
        return Ok(());
    }

    let file = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_dir_all(".", &config.staging)
        .with_context(|| format!("archiving {}", config.staging.display()))?;
    builder
        .into_inner()
        .context("finishing tar stream")?
        .finish()
        .context("finishing gzip stream")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;
    use flate2::read::GzDecoder;
    use std::fs;

    #[test]
    fn archive_contains_staged_files() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("staging");
        fs::create_dir_all(staging.join("tools")).unwrap();
        fs::write(staging.join("tools/bootserver"), "tool").unwrap();

        let config = Config {
            root: tmp.path().into(),
            staging,
            archive: true,
            output: tmp.path().join("fuchsia-sdk.tgz"),
            features: Features::default(),
            verbose: false,
            dry_run: false,
        };
        create_archive(&config).unwrap();

        let decoder = GzDecoder::new(File::open(&config.output).unwrap());
        let mut archive = tar::Archive::new(decoder);
        let has_tool = archive.entries().unwrap().any(|entry| {
            entry
                .unwrap()
                .path()
                .unwrap()
                .ends_with("tools/bootserver")
        });
        assert!(has_tool);
    }

    #[test]
    fn dry_run_writes_no_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();

        let config = Config {
            root: tmp.path().into(),
            staging,
            archive: true,
            output: tmp.path().join("fuchsia-sdk.tgz"),
            features: Features::default(),
            verbose: false,
            dry_run: true,
        };
        create_archive(&config).unwrap();
        assert!(!config.output.exists());
    }
}
