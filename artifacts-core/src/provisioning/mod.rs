//! Provisioning of the vcpkg-artifacts bundle.
//!
//! # Architecture
//!
//! - `mode`: Provisioning mode selection and path resolution
//! - `paths`: On-disk layout of installed bundles and archives
//! - `downloader`: HTTPS download transport with checksum verification
//! - `runtime`: The Node.js runtime and its npm installation
//! - `env`: `PATH` handling for the unpack step
//! - `installer`: Download, unpack and cleanup state machine
//!
//! # Example
//!
//! ```ignore
//! use artifacts_core::provisioning::{resolve, BundleInstaller};
//!
//! let bundle = resolve(&BuildConfig::from_build_env(), &default_cache_root());
//! let installer = BundleInstaller::new(downloader, runner, node, downloads);
//! let entry = installer.ensure_installed(&bundle).await?;
//! ```

pub mod downloader;
pub mod env;
pub mod installer;
pub mod mode;
pub mod paths;
pub mod runtime;

pub use downloader::{Downloader, HttpDownloader};
pub use installer::BundleInstaller;
pub use mode::{resolve, ProvisioningMode, ResolvedBundle};
pub use runtime::NodeRuntime;
