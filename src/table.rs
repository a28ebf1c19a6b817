//! The declarative copy table.
//!
//! Every artifact the SDK may contain is one [`CopyEntry`]: a feature gate, a
//! source path relative to the Fuchsia root, a destination path relative to
//! the staging directory, and a kind. The table is built once at startup from
//! static path templates; the executor in `copy.rs` consumes it in order.

use std::path::{Path, PathBuf};

use crate::config::{Feature, Host};

/// Release build directory for the x64 target.
pub const X64_BUILD_DIR: &str = "out/release-x64";
/// Release build directory for the arm64 target.
pub const ARM_BUILD_DIR: &str = "out/release-arm64";

const ZX_BUILD_DIR: &str = "out/build-zircon";
const X64_BOOTFS_DIR: &str = "out/release-x64-bootfs";
const ARM_BOOTFS_DIR: &str = "out/release-arm64-bootfs";

/// How an entry is executed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CopyKind {
    /// Recursive directory copy onto the destination.
    Dir,
    /// Single file copy, destination parents created first.
    File,
    /// One of the two procedures plain copies cannot express.
    Custom(CustomOp),
}

/// Copy procedures with logic beyond a plain file or directory copy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CustomOp {
    /// Walk the source tree and copy only `.elf` files, preserving layout.
    DebugObjects,
    /// Rewrite the absolute paths in `ids.txt` relative to the build directory.
    IdsIndex,
}

/// One unit of work: copy `src` to `dst` when `feature` is enabled.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CopyEntry {
    pub feature: Feature,
    pub src: PathBuf,
    pub dst: PathBuf,
    pub kind: CopyKind,
}

impl CopyEntry {
    fn dir(feature: Feature, src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        CopyEntry {
            feature,
            src: src.into(),
            dst: dst.into(),
            kind: CopyKind::Dir,
        }
    }

    fn file(feature: Feature, src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        CopyEntry {
            feature,
            src: src.into(),
            dst: dst.into(),
            kind: CopyKind::File,
        }
    }

    fn custom(
        feature: Feature,
        op: CustomOp,
        src: impl Into<PathBuf>,
        dst: impl Into<PathBuf>,
    ) -> Self {
        CopyEntry {
            feature,
            src: src.into(),
            dst: dst.into(),
            kind: CopyKind::Custom(op),
        }
    }
}

/// Client-library public headers, duplicated into both architectures'
/// include trees. `(feature, source, path within the sysroot include dir)`.
const CLIENT_HEADERS: &[(Feature, &str, &str)] = &[
    (
        Feature::Media,
        "garnet/public/lib/media/c/audio.h",
        "media/audio.h",
    ),
    (
        Feature::Sysroot,
        "garnet/public/lib/netstack/c/netconfig.h",
        "netstack/netconfig.h",
    ),
];

/// Client shared libraries, duplicated into both architectures' lib trees,
/// with a stripped and an unstripped (debug) variant each.
const CLIENT_LIBS: &[(Feature, &str)] = &[(Feature::Media, "libmedia_client.so")];

/// Build the full copy table for the given host.
///
/// Construction is pure template substitution; source paths are only checked
/// for existence when the executor runs the entry. Directory entries precede
/// file entries precede custom entries, though the executor does not depend
/// on that order.
pub fn build_table(host: &Host) -> Vec<CopyEntry> {
    let x64_build = Path::new(X64_BUILD_DIR);
    let arm_build = Path::new(ARM_BUILD_DIR);
    let x64_zx_build = Path::new(ZX_BUILD_DIR).join("build-x64");
    let arm_zx_build = Path::new(ZX_BUILD_DIR).join("build-arm64");
    let qemu_dir = format!("buildtools/{}-{}/qemu", host.os, host.cpu);
    let clang_dir = format!("buildtools/{}-{}/clang", host.os, host.cpu);

    let mut entries = vec![
        CopyEntry::dir(
            Feature::Sysroot,
            x64_build.join("sdks/zircon_sysroot/sysroot"),
            "sysroot/x86_64-fuchsia",
        ),
        CopyEntry::dir(
            Feature::Sysroot,
            arm_build.join("sdks/zircon_sysroot/sysroot"),
            "sysroot/aarch64-fuchsia",
        ),
        CopyEntry::dir(Feature::Qemu, qemu_dir, "qemu"),
        CopyEntry::dir(Feature::Tools, Path::new(ZX_BUILD_DIR).join("tools"), "tools"),
        CopyEntry::dir(Feature::Tools, x64_build.join("host_x64/far"), "tools/far"),
        CopyEntry::dir(Feature::Tools, x64_build.join("host_x64/pm"), "tools/pm"),
        CopyEntry::dir(Feature::Toolchain, clang_dir.clone(), "clang"),
        CopyEntry::dir(
            Feature::ToolchainLibs,
            format!("{clang_dir}/lib/clang/7.0.0/lib/fuchsia"),
            "toolchain_libs/clang/7.0.0/lib/fuchsia",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            arm_zx_build.join("qemu-zircon.bin"),
            "target/aarch64/zircon.bin",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            arm_build.join("bootdata-blob-qemu.bin"),
            "target/aarch64/bootdata-blob.bin",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            arm_build.join("images/fvm.blk"),
            "target/aarch64/fvm.blk",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_zx_build.join("zircon.bin"),
            "target/x86_64/zircon.bin",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_build.join("bootdata-blob-pc.bin"),
            "target/x86_64/bootdata-blob.bin",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_build.join("images/local-pc.esp.blk"),
            "target/x86_64/local.esp.blk",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_build.join("images/zircon-pc.vboot"),
            "target/x86_64/zircon.vboot",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_build.join("images/fvm.blk"),
            "target/x86_64/fvm.blk",
        ),
        CopyEntry::file(
            Feature::KernelImg,
            x64_build.join("images/fvm.sparse.blk"),
            "target/x86_64/fvm.sparse.blk",
        ),
        // TODO(bootfs deprecation): drop these once bootfs images stop shipping.
        CopyEntry::file(
            Feature::Bootdata,
            Path::new(X64_BOOTFS_DIR).join("user.bootfs"),
            "target/x86_64/bootdata.bin",
        ),
        CopyEntry::file(
            Feature::Bootdata,
            Path::new(ARM_BOOTFS_DIR).join("user.bootfs"),
            "target/aarch64/bootdata.bin",
        ),
    ];

    for &(feature, src, dst) in CLIENT_HEADERS {
        entries.push(CopyEntry::file(
            feature,
            src,
            Path::new("sysroot/x86_64-fuchsia/include").join(dst),
        ));
        entries.push(CopyEntry::file(
            feature,
            src,
            Path::new("sysroot/aarch64-fuchsia/include").join(dst),
        ));
    }

    for &(feature, name) in CLIENT_LIBS {
        entries.push(CopyEntry::file(
            feature,
            x64_build.join("x64-shared").join(name),
            Path::new("sysroot/x86_64-fuchsia/lib").join(name),
        ));
        entries.push(CopyEntry::file(
            feature,
            x64_build.join("x64-shared/lib.unstripped").join(name),
            Path::new("sysroot/x86_64-fuchsia/debug").join(name),
        ));
        entries.push(CopyEntry::file(
            feature,
            arm_build.join("arm64-shared").join(name),
            Path::new("sysroot/aarch64-fuchsia/lib").join(name),
        ));
        entries.push(CopyEntry::file(
            feature,
            arm_build.join("arm64-shared/lib.unstripped").join(name),
            Path::new("sysroot/aarch64-fuchsia/debug").join(name),
        ));
    }

    entries.extend([
        CopyEntry::custom(
            Feature::KernelDbg,
            CustomOp::DebugObjects,
            x64_zx_build,
            "sysroot/x86_64-fuchsia/debug",
        ),
        CopyEntry::custom(
            Feature::KernelDbg,
            CustomOp::IdsIndex,
            X64_BUILD_DIR,
            "sysroot/x86_64-fuchsia/debug",
        ),
        CopyEntry::custom(
            Feature::KernelDbg,
            CustomOp::DebugObjects,
            arm_zx_build,
            "sysroot/aarch64-fuchsia/debug",
        ),
        CopyEntry::custom(
            Feature::KernelDbg,
            CustomOp::IdsIndex,
            ARM_BUILD_DIR,
            "sysroot/aarch64-fuchsia/debug",
        ),
    ]);

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;

    fn test_host() -> Host {
        Host {
            os: "linux".into(),
            cpu: "x64".into(),
        }
    }

    #[test]
    fn table_is_deterministic() {
        let first = build_table(&test_host());
        let second = build_table(&test_host());
        assert_eq!(first, second);
    }

    #[test]
    fn table_has_expected_shape() {
        let entries = build_table(&test_host());
        assert_eq!(entries.len(), 31);

        let dirs = entries.iter().filter(|e| e.kind == CopyKind::Dir).count();
        let files = entries.iter().filter(|e| e.kind == CopyKind::File).count();
        let customs = entries
            .iter()
            .filter(|e| matches!(e.kind, CopyKind::Custom(_)))
            .count();
        assert_eq!(dirs, 8);
        assert_eq!(files, 19);
        assert_eq!(customs, 4);

        // Both ids.txt rewrites and both debug-object walks are present.
        let ids = entries
            .iter()
            .filter(|e| e.kind == CopyKind::Custom(CustomOp::IdsIndex))
            .count();
        assert_eq!(ids, 2);
    }

    #[test]
    fn host_parameterizes_buildtools_paths() {
        let entries = build_table(&Host {
            os: "mac".into(),
            cpu: "arm64".into(),
        });
        assert!(
            entries
                .iter()
                .any(|e| e.src == Path::new("buildtools/mac-arm64/qemu"))
        );
        assert!(
            entries
                .iter()
                .any(|e| e.src == Path::new("buildtools/mac-arm64/clang"))
        );
    }

    #[test]
    fn disabling_media_removes_exactly_its_entries() {
        let entries = build_table(&test_host());

        let defaults = Features::default();
        let no_media = Features {
            media: false,
            ..Features::default()
        };

        let enabled_default = entries
            .iter()
            .filter(|e| defaults.enabled(e.feature))
            .count();
        let enabled_no_media: Vec<_> = entries
            .iter()
            .filter(|e| no_media.enabled(e.feature))
            .collect();

        // One header into two include trees plus four library variants.
        assert_eq!(enabled_default - enabled_no_media.len(), 6);
        assert!(
            enabled_no_media
                .iter()
                .all(|e| e.feature != Feature::Media)
        );

        // Sysroot entries are untouched by the media flag.
        let sysroot_count = |features: &Features| {
            entries
                .iter()
                .filter(|e| e.feature == Feature::Sysroot && features.enabled(e.feature))
                .count()
        };
        assert_eq!(sysroot_count(&defaults), sysroot_count(&no_media));
    }

    #[test]
    fn toolchain_only_selection_keeps_one_entry() {
        let entries = build_table(&test_host());
        let toolchain_only = Features {
            sysroot: false,
            toolchain: true,
            toolchain_lib: false,
            kernel_img: false,
            kernel_dbg: false,
            bootdata: false,
            qemu: false,
            tools: false,
            media: false,
        };

        let enabled: Vec<_> = entries
            .iter()
            .filter(|e| toolchain_only.enabled(e.feature))
            .collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].dst, Path::new("clang"));
        assert_eq!(enabled[0].kind, CopyKind::Dir);
    }
}
