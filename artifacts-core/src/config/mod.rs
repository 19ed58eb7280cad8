//! Configuration for the configure-environment command.
//!
//! Build-time settings select how the bundle is provisioned; run-time
//! settings carry host flags and the host's coordination paths.

mod build_config;
mod host_paths;
mod settings;

pub use build_config::{BuildConfig, DEFAULT_BASE_VERSION};
pub use host_paths::{default_cache_root, HostPaths};
pub use settings::Settings;
