//! Provisioning mode selection.
//!
//! The mode is decided once from [`BuildConfig`] and never changes for the
//! lifetime of the process. Resolution is pure: the same configuration and
//! cache root always yield the same paths.

use std::fmt;
use std::path::{Path, PathBuf};

use super::paths::{self, LATEST_LABEL};
use crate::config::BuildConfig;

/// Release download location for a pinned bundle version.
const RELEASE_URI_PREFIX: &str = "https://github.com/microsoft/vcpkg-tool/releases/download";

/// Download location of the most recent bundle release.
const LATEST_URI: &str =
    "https://github.com/microsoft/vcpkg-tool/releases/latest/download/vcpkg-ce.tgz";

/// How the vcpkg-artifacts bundle is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningMode {
    /// In-development build at a fixed path; never downloaded.
    Local(PathBuf),
    /// Release build pinned to a version and archive hash.
    Pinned { version: String, sha256: String },
    /// Always fetch the most recent release.
    Latest,
}

impl ProvisioningMode {
    /// Selects the mode for a build configuration.
    ///
    /// A local path wins over a pinned hash, which wins over latest.
    pub fn from_build_config(config: &BuildConfig) -> Self {
        if let Some(path) = &config.artifacts_path {
            Self::Local(PathBuf::from(path))
        } else if let Some(sha) = &config.ce_sha {
            Self::Pinned {
                version: config.base_version.clone(),
                sha256: sha.clone(),
            }
        } else {
            Self::Latest
        }
    }

    /// Version label used in cache and archive names, `None` for local builds.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Local(_) => None,
            Self::Pinned { version, .. } => Some(version),
            Self::Latest => Some(LATEST_LABEL),
        }
    }

    /// Returns the archive URI, `None` for local builds.
    pub fn download_uri(&self) -> Option<String> {
        match self {
            Self::Local(_) => None,
            Self::Pinned { version, .. } => {
                Some(format!("{}/{}/vcpkg-ce.tgz", RELEASE_URI_PREFIX, version))
            }
            Self::Latest => Some(LATEST_URI.to_string()),
        }
    }

    /// Expected SHA-256 of the archive, if the mode pins one.
    pub fn expected_sha256(&self) -> Option<&str> {
        match self {
            Self::Pinned { sha256, .. } => Some(sha256),
            _ => None,
        }
    }
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "local ({})", path.display()),
            Self::Pinned { version, .. } => write!(f, "pinned ({})", version),
            Self::Latest => write!(f, "latest"),
        }
    }
}

/// A provisioning mode together with the paths it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBundle {
    pub mode: ProvisioningMode,
    /// Directory the bundle is unpacked into (the local path itself in
    /// development mode).
    pub install_base: PathBuf,
    /// Entry directory passed to the node runtime.
    pub tool_dir: PathBuf,
}

impl ResolvedBundle {
    /// Returns the archive download path below `downloads`, `None` for
    /// local builds.
    pub fn archive_path(&self, downloads: &Path) -> Option<PathBuf> {
        self.mode
            .label()
            .map(|label| paths::archive_path(downloads, label))
    }
}

/// Resolves the bundle location for a build configuration.
pub fn resolve(config: &BuildConfig, cache_root: &Path) -> ResolvedBundle {
    let mode = ProvisioningMode::from_build_config(config);
    let (install_base, tool_dir) = match &mode {
        ProvisioningMode::Local(path) => (path.clone(), path.clone()),
        ProvisioningMode::Pinned { version, .. } => managed_dirs(cache_root, version),
        ProvisioningMode::Latest => managed_dirs(cache_root, LATEST_LABEL),
    };
    ResolvedBundle {
        mode,
        install_base,
        tool_dir,
    }
}

fn managed_dirs(cache_root: &Path, label: &str) -> (PathBuf, PathBuf) {
    let install_base = paths::install_base(cache_root, label);
    let tool_dir = paths::tool_dir(&install_base);
    (install_base, tool_dir)
}
