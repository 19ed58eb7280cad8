//! Paths the host hands to the delegated tool.
//!
//! Defaults follow the vcpkg layout:
//!
//! - downloads: `{root}/downloads`
//! - artifacts: `{root}/artifacts`
//! - registries cache: `{cache}/vcpkg/registries`
//! - global config: `{config}/vcpkg/vcpkg-configuration.json`
//! - scratch files: `{temp}/vcpkg-artifacts`

use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Subdirectory of the platform cache/config dirs owned by vcpkg.
const VCPKG_DIR: &str = "vcpkg";

/// Subdirectory of the OS temp folder used for scratch files.
const SCRATCH_DIR: &str = "vcpkg-artifacts";

/// Name forwarded as `--z-vcpkg-command` when the running executable
/// cannot be located.
const FALLBACK_SELF_EXE: &str = "vcpkg";

/// Coordination paths owned by the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    /// vcpkg root directory.
    pub root: PathBuf,
    /// Path of the currently running host executable.
    pub self_exe: PathBuf,
    /// Root where artifacts are installed.
    pub artifacts_root: PathBuf,
    /// Downloads directory (also receives the bundle archive).
    pub downloads: PathBuf,
    /// Cache of registry checkouts.
    pub registries_cache: PathBuf,
    /// Global vcpkg configuration file.
    pub global_config: PathBuf,
    /// Working directory the user invoked the host from.
    pub original_cwd: PathBuf,
    /// Scratch directory for one-shot files shared with the child.
    pub temp_dir: PathBuf,
    /// Per-platform cache root holding installed bundles.
    pub cache_root: PathBuf,
}

impl HostPaths {
    /// Builds the default layout for a vcpkg root.
    pub fn for_root(root: impl Into<PathBuf>, original_cwd: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cache_root = default_cache_root();
        Self {
            self_exe: self_exe_or_fallback(std::env::current_exe()),
            artifacts_root: root.join("artifacts"),
            downloads: root.join("downloads"),
            registries_cache: cache_root.join("registries"),
            global_config: default_global_config(),
            original_cwd: original_cwd.into(),
            temp_dir: std::env::temp_dir().join(SCRATCH_DIR),
            cache_root,
            root,
        }
    }

    /// Returns the scratch directory, creating it if needed.
    pub async fn ensure_temp_dir(&self) -> io::Result<&Path> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        Ok(&self.temp_dir)
    }
}

/// Returns the per-platform vcpkg cache root.
///
/// e.g., `~/.cache/vcpkg` on Linux, `~/Library/Caches/vcpkg` on macOS,
/// `%LOCALAPPDATA%\vcpkg` on Windows
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(VCPKG_DIR)
}

fn self_exe_or_fallback(current: io::Result<PathBuf>) -> PathBuf {
    match current {
        Ok(path) => path,
        Err(e) => {
            warn!(
                "Failed to locate the running executable, forwarding {:?} instead: {}",
                FALLBACK_SELF_EXE, e
            );
            PathBuf::from(FALLBACK_SELF_EXE)
        }
    }
}

fn default_global_config() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(VCPKG_DIR)
        .join("vcpkg-configuration.json")
}
