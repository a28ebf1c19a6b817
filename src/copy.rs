//! Copy execution: plain copies plus the two custom procedures.
//!
//! Every mutating step prints a line under `-v` or `-n` and is skipped
//! entirely under `-n`. Copy and create failures are fatal; the only
//! recoverable condition in the whole tool is a bad record in `ids.txt`.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::Config;
use crate::table::{CopyEntry, CopyKind, CustomOp};

/// Run every enabled table entry.
///
/// Sources resolve against the project root, destinations against the staging
/// directory. Entries are independent; the first failure aborts the run.
pub fn execute(config: &Config, entries: &[CopyEntry]) -> Result<()> {
    for entry in entries {
        if !config.enabled(entry.feature) {
            continue;
        }
        let src = config.root.join(&entry.src);
        let dst = config.staging.join(&entry.dst);
        match entry.kind {
            CopyKind::Dir => copy_dir(config, &src, &dst)?,
            CopyKind::File => copy_file(config, &src, &dst)?,
            CopyKind::Custom(CustomOp::DebugObjects) => copy_debug_objects(config, &src, &dst)?,
            CopyKind::Custom(CustomOp::IdsIndex) => rewrite_ids(config, &src, &dst)?,
        }
    }
    Ok(())
}

/// Copy a single file, creating destination parent directories first.
fn copy_file(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    if config.verbose || config.dry_run {
        println!("Copying {} -> {}", src.display(), dst.display());
    }
    if config.dry_run {
        return Ok(());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("copying {} -> {}", src.display(), dst.display()))?;
    Ok(())
}

/// Copy a directory onto `dst`.
///
/// `dst` becomes the copied root itself (`cp -r -T` semantics), not a new
/// child of it. A source that is a single file degenerates to a file copy;
/// the far and pm tool entries rely on this.
fn copy_dir(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    if config.verbose || config.dry_run {
        println!("Copying {} -> {}", src.display(), dst.display());
    }
    if config.dry_run {
        return Ok(());
    }
    if src.is_dir() {
        copy_tree(src, dst)
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::copy(src, dst)
            .with_context(|| format!("copying {} -> {}", src.display(), dst.display()))?;
        Ok(())
    }
}

/// Recursively copy a directory tree. Symlinks are re-created as symlinks
/// rather than followed.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating directory {}", dst.display()))?;

    for entry in
        fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let dest = dst.join(entry.file_name());

        if path.is_symlink() {
            let target = fs::read_link(&path)
                .with_context(|| format!("reading symlink {}", path.display()))?;
            if !dest.exists() && !dest.is_symlink() {
                std::os::unix::fs::symlink(&target, &dest)
                    .with_context(|| format!("creating symlink {}", dest.display()))?;
            }
        } else if path.is_dir() {
            copy_tree(&path, &dest)?;
        } else {
            fs::copy(&path, &dest)
                .with_context(|| format!("copying {} -> {}", path.display(), dest.display()))?;
        }
    }

    Ok(())
}

/// Copy kernel debug objects.
///
/// The kernel debug information lives in many `.elf` files scattered through
/// the build tree; copy exactly those, preserving their relative layout under
/// the destination prefix. Unreadable walk entries are skipped; a failed copy
/// of a discovered file is fatal.
fn copy_debug_objects(config: &Config, src: &Path, dst_prefix: &Path) -> Result<()> {
    if config.verbose || config.dry_run {
        println!(
            "Copying debug objects {} -> {}",
            src.display(),
            dst_prefix.display()
        );
    }
    if config.dry_run {
        return Ok(());
    }

    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "elf") {
            continue;
        }
        let rel = path.strip_prefix(src).unwrap_or(path);
        let dest = dst_prefix.join(rel);
        if config.verbose {
            println!("Copying {} -> {}", path.display(), dest.display());
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::copy(path, &dest)
            .with_context(|| format!("copying {} -> {}", path.display(), dest.display()))?;
    }

    Ok(())
}

/// Rewrite the build-id index.
///
/// `ids.txt` maps build identifiers to absolute object paths; relative paths
/// are more useful inside the SDK, so each record is rewritten relative to
/// the source build directory. A record whose path lies outside that base
/// (or a line with no space separator) is skipped with a warning — the one
/// non-fatal error in the tool.
fn rewrite_ids(config: &Config, src_dir: &Path, dst_prefix: &Path) -> Result<()> {
    if config.verbose || config.dry_run {
        println!(
            "Rewriting {} -> {}",
            src_dir.join("ids.txt").display(),
            dst_prefix.join("ids.txt").display()
        );
    }
    if config.dry_run {
        return Ok(());
    }

    let src_path = src_dir.join("ids.txt");
    let src_file =
        fs::File::open(&src_path).with_context(|| format!("opening {}", src_path.display()))?;

    fs::create_dir_all(dst_prefix)
        .with_context(|| format!("creating directory {}", dst_prefix.display()))?;
    let dst_path = dst_prefix.join("ids.txt");
    let mut out = BufWriter::new(
        fs::File::create(&dst_path).with_context(|| format!("creating {}", dst_path.display()))?,
    );

    let base = std::path::absolute(src_dir)
        .with_context(|| format!("resolving {}", src_dir.display()))?;

    for line in BufReader::new(src_file).lines() {
        let line = line.with_context(|| format!("reading {}", src_path.display()))?;
        let Some((id, abs_path)) = line.split_once(' ') else {
            eprintln!(
                "warning: malformed record {:?} in {}, skipping entry",
                line,
                src_path.display()
            );
            continue;
        };
        match Path::new(abs_path).strip_prefix(&base) {
            Ok(rel) => writeln!(out, "{id} {}", rel.display())
                .with_context(|| format!("writing {}", dst_path.display()))?,
            Err(_) => eprintln!(
                "warning: could not make path {} relative to base {}, skipping entry",
                abs_path,
                base.display()
            ),
        }
    }

    out.flush()
        .with_context(|| format!("writing {}", dst_path.display()))?;
    Ok(())
}
