//! On-disk layout of provisioned bundles.
//!
//! - Install base: `{cache}/artifacts-{version|latest}/`
//! - Tool entry: `{cache}/artifacts-{version|latest}/node_modules/vcpkg-ce/`
//! - Archive: `{downloads}/vcpkg-ce-{version|latest}.tgz` (transient)

use std::path::{Path, PathBuf};

/// Package name of the bundle inside `node_modules`.
pub const TOOL_NAME: &str = "vcpkg-ce";

/// Label used instead of a version for the unpinned channel.
pub const LATEST_LABEL: &str = "latest";

/// Returns the directory the bundle is unpacked into.
pub fn install_base(cache_root: &Path, label: &str) -> PathBuf {
    cache_root.join(format!("artifacts-{}", label))
}

/// Returns the bundle's entry directory below an install base.
pub fn tool_dir(install_base: &Path) -> PathBuf {
    install_base.join("node_modules").join(TOOL_NAME)
}

/// Returns the deterministic path the archive is downloaded to.
pub fn archive_path(downloads: &Path, label: &str) -> PathBuf {
    downloads.join(format!("{}-{}.tgz", TOOL_NAME, label))
}
