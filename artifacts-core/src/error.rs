//! Error types for provisioning and delegation.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code reported when the bundle could not be provisioned or the
/// delegated process could not be started.
pub const INTERNAL_ERROR_EXIT_CODE: i32 = 1;

/// Failures while making the vcpkg-artifacts bundle available locally.
///
/// Every variant leaves the install base either fully absent or untouched;
/// partially unpacked directories are removed before the error is returned.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The download transport failed (network, HTTP status, checksum).
    #[error("failed to download {uri}: {source:#}")]
    Download {
        uri: String,
        #[source]
        source: anyhow::Error,
    },
    /// The transport reported success but the archive is not on disk.
    #[error("download succeeded but {} is not a file", path.display())]
    ArchiveMissing { path: PathBuf },
    /// No npm entry point next to the node runtime.
    #[error("npm was not found next to node at {}", node_root.display())]
    NpmNotFound { node_root: PathBuf },
    /// The package manager exited unsuccessfully or could not be started.
    #[error("unpacking {} failed: {reason}", archive.display())]
    Unpack { archive: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the configure-environment command as a whole.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to provision vcpkg-artifacts: {0}")]
    Provision(#[from] ProvisionError),
    /// The delegated process could not be launched at all.
    #[error("failed to launch vcpkg-artifacts: {0}")]
    Delegation(#[source] std::io::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Exit code the host should report for this error.
    pub fn exit_code(&self) -> i32 {
        INTERNAL_ERROR_EXIT_CODE
    }
}
