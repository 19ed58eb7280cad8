//! Build-time provisioning configuration.
//!
//! These values are baked into the binary by the environment the crate was
//! compiled in:
//!
//! - `VCPKG_ARTIFACTS_PATH`: use an in-tree development build of the bundle
//! - `VCPKG_CE_SHA`: pin the bundle to `VCPKG_BASE_VERSION` with this SHA-256
//! - `VCPKG_BASE_VERSION`: bundle release tag (defaults to the crate version)

/// Bundle version used when `VCPKG_BASE_VERSION` is not set at build time.
pub const DEFAULT_BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static configuration that decides the provisioning mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Local development build of the bundle, if any.
    pub artifacts_path: Option<String>,
    /// Expected SHA-256 of the pinned bundle archive.
    pub ce_sha: Option<String>,
    /// Release tag of the bundle this binary was built against.
    pub base_version: String,
}

impl BuildConfig {
    /// Returns the configuration compiled into this binary.
    pub fn from_build_env() -> Self {
        Self {
            artifacts_path: non_empty(option_env!("VCPKG_ARTIFACTS_PATH")),
            ce_sha: non_empty(option_env!("VCPKG_CE_SHA")),
            base_version: non_empty(option_env!("VCPKG_BASE_VERSION"))
                .unwrap_or_else(|| DEFAULT_BASE_VERSION.to_string()),
        }
    }

    /// Configuration that always fetches the latest bundle release.
    pub fn latest(base_version: impl Into<String>) -> Self {
        Self {
            artifacts_path: None,
            ce_sha: None,
            base_version: base_version.into(),
        }
    }

    /// Configuration pinned to `base_version` with the given archive hash.
    pub fn pinned(base_version: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            artifacts_path: None,
            ce_sha: Some(sha256.into()),
            base_version: base_version.into(),
        }
    }

    /// Configuration using a development build at `path`.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            artifacts_path: Some(path.into()),
            ce_sha: None,
            base_version: DEFAULT_BASE_VERSION.to_string(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
