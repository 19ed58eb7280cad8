//! Private coordination flags shared with vcpkg-ce.
//!
//! The `--z-*` flags are not part of vcpkg-ce's public command line. They
//! change together with the bundle version this binary pins, so both sides
//! must be upgraded in lockstep. Bump [`PROTOCOL_REVISION`] whenever a flag
//! is added, removed or reordered.

use std::path::PathBuf;

use crate::process::CommandLine;

/// Revision of the flag set below.
pub const PROTOCOL_REVISION: u32 = 1;

pub const DEBUG_FLAG: &str = "--debug";
pub const TELEMETRY_FILE_FLAG: &str = "--z-telemetry-file";
pub const VCPKG_ROOT_FLAG: &str = "--vcpkg-root";
pub const VCPKG_COMMAND_FLAG: &str = "--z-vcpkg-command";
pub const ARTIFACTS_ROOT_FLAG: &str = "--z-vcpkg-artifacts-root";
pub const DOWNLOADS_FLAG: &str = "--z-vcpkg-downloads";
pub const REGISTRIES_CACHE_FLAG: &str = "--z-vcpkg-registries-cache";
pub const NEXT_PREVIOUS_ENVIRONMENT_FLAG: &str = "--z-next-previous-environment";
pub const GLOBAL_CONFIG_FLAG: &str = "--z-global-config";
pub const LANGUAGE_FLAG: &str = "--language";

/// Everything the host tells vcpkg-ce after the user's own arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinationArgs {
    pub debug: bool,
    /// Where vcpkg-ce may write its telemetry record; absent when metrics
    /// are disabled.
    pub telemetry_file: Option<PathBuf>,
    pub vcpkg_root: PathBuf,
    /// Path of the host executable, so vcpkg-ce can call back into it.
    pub vcpkg_command: PathBuf,
    pub artifacts_root: PathBuf,
    pub downloads: PathBuf,
    pub registries_cache: PathBuf,
    /// Where vcpkg-ce stores the environment to restore on deactivation.
    pub next_previous_environment: PathBuf,
    pub global_config: PathBuf,
    /// Message catalog copied out of the host, if one was loaded.
    pub language_file: Option<PathBuf>,
}

impl CoordinationArgs {
    /// Appends the flags to `cmd` in protocol order.
    pub fn write_to(&self, cmd: &mut CommandLine) {
        if self.debug {
            cmd.arg(DEBUG_FLAG);
        }
        if let Some(path) = &self.telemetry_file {
            cmd.flag(TELEMETRY_FILE_FLAG, path);
        }
        cmd.flag(VCPKG_ROOT_FLAG, &self.vcpkg_root)
            .flag(VCPKG_COMMAND_FLAG, &self.vcpkg_command)
            .flag(ARTIFACTS_ROOT_FLAG, &self.artifacts_root)
            .flag(DOWNLOADS_FLAG, &self.downloads)
            .flag(REGISTRIES_CACHE_FLAG, &self.registries_cache)
            .flag(NEXT_PREVIOUS_ENVIRONMENT_FLAG, &self.next_previous_environment)
            .flag(GLOBAL_CONFIG_FLAG, &self.global_config);
        if let Some(path) = &self.language_file {
            cmd.flag(LANGUAGE_FLAG, path);
        }
    }
}
