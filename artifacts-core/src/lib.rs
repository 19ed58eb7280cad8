//! vcpkg-artifacts Core Library
//!
//! This crate implements the host side of vcpkg's `configure-environment`
//! command, which delegates artifact management to the Node.js-based
//! vcpkg-ce tool. It includes:
//!
//! - Build- and run-time configuration (provisioning mode, host paths)
//! - Provisioning of the vcpkg-ce bundle (download, verify, unpack)
//! - Assembly of the node command line and its private coordination flags
//! - Subprocess execution with inherited standard streams
//! - Harvesting of the telemetry record the tool writes back

pub mod command;
pub mod config;
pub mod error;
pub mod invocation;
pub mod process;
pub mod provisioning;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use command::{exit_code, ConfigureEnvironment};
pub use config::{default_cache_root, BuildConfig, HostPaths, Settings, DEFAULT_BASE_VERSION};
pub use error::{CommandError, ProvisionError, INTERNAL_ERROR_EXIT_CODE};

// Re-export delegation
pub use invocation::{IdGenerator, Invocation, InvocationBuilder, UuidGenerator};
pub use process::{CommandLine, ProcessRunner, SystemProcessRunner};

// Re-export provisioning
pub use provisioning::{
    resolve, BundleInstaller, Downloader, HttpDownloader, NodeRuntime, ProvisioningMode,
    ResolvedBundle,
};

// Re-export telemetry
pub use telemetry::{harvest_telemetry, MetricsSink, StringMetric};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn exports_are_accessible() {
        fn _check_types(
            _command: &ConfigureEnvironment,
            _settings: &Settings,
            _paths: &HostPaths,
            _mode: &ProvisioningMode,
            _bundle: &ResolvedBundle,
            _runtime: &NodeRuntime,
            _downloader: &HttpDownloader,
            _runner: &SystemProcessRunner,
            _metric: StringMetric,
        ) {
        }
    }

    #[test]
    fn default_build_config_matches_version() {
        let config = BuildConfig::latest(VERSION);
        assert_eq!(config.base_version, VERSION);
    }
}
