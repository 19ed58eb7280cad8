//! Environment helpers for the provisioning runtime.
//!
//! The package manager run during unpacking must resolve `node` to the same
//! runtime that launched it, so the runtime's directory is put in front of
//! the inherited `PATH`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prepends `dir` to a `PATH` value.
///
/// Falls back to `dir` alone if the existing entries cannot be joined (an
/// entry containing the platform separator).
pub fn prepend_to_path(dir: &Path, existing: Option<OsString>) -> OsString {
    let mut entries: Vec<PathBuf> = vec![dir.to_path_buf()];
    if let Some(existing) = existing.as_deref() {
        entries.extend(std::env::split_paths(existing).filter(|p| p != dir));
    }

    match std::env::join_paths(&entries) {
        Ok(joined) => joined,
        Err(e) => {
            debug!("Failed to join PATH entries: {}", e);
            dir.as_os_str().to_os_string()
        }
    }
}

/// Returns the `PATH` override that puts `runtime_dir` first.
pub fn runtime_path_override(runtime_dir: &Path) -> (String, OsString) {
    let path = prepend_to_path(runtime_dir, std::env::var_os("PATH"));
    ("PATH".to_string(), path)
}
