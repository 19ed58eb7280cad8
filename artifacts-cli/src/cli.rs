//! CLI argument parsing using clap derive

use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

use artifacts_core::{HostPaths, Settings};

/// vcpkg-artifacts - Acquire and activate the artifacts a project needs
///
/// Host options come first. Everything from the first positional argument
/// on is forwarded to vcpkg-ce unchanged.
///
/// Examples:
///   vcpkg-artifacts activate
///   vcpkg-artifacts --debug use cmake --json
///   vcpkg-artifacts --vcpkg-root /src/vcpkg add ninja
#[derive(Parser, Debug)]
#[command(name = "vcpkg-artifacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Forward --debug to vcpkg-ce and enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Do not ask vcpkg-ce for telemetry
    #[arg(long, env = "VCPKG_DISABLE_METRICS", value_parser = FalseyValueParser::new())]
    pub disable_metrics: bool,

    /// vcpkg root directory (defaults to the current directory)
    #[arg(long, env = "VCPKG_ROOT")]
    pub vcpkg_root: Option<PathBuf>,

    /// Downloads directory (defaults to <root>/downloads)
    #[arg(long, env = "VCPKG_DOWNLOADS")]
    pub downloads: Option<PathBuf>,

    /// Artifacts installation root (defaults to <root>/artifacts)
    #[arg(long)]
    pub artifacts_root: Option<PathBuf>,

    /// Cache root holding installed bundles
    #[arg(long)]
    pub cache_root: Option<PathBuf>,

    /// Registries cache (defaults to <cache root>/registries)
    #[arg(long)]
    pub registries_cache: Option<PathBuf>,

    /// Global vcpkg-configuration.json
    #[arg(long)]
    pub global_config: Option<PathBuf>,

    /// Node executable (defaults to node on PATH)
    #[arg(long, env = "VCPKG_NODE")]
    pub node: Option<PathBuf>,

    /// Message catalog (JSON) to hand to vcpkg-ce
    #[arg(long)]
    pub language: Option<PathBuf>,

    /// Arguments forwarded to vcpkg-ce
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings::new(self.debug, !self.disable_metrics)
    }

    /// Builds the host paths, applying overrides on top of the defaults
    /// for the vcpkg root.
    pub fn host_paths(&self, original_cwd: PathBuf) -> HostPaths {
        let root = self
            .vcpkg_root
            .clone()
            .unwrap_or_else(|| original_cwd.clone());
        let mut paths = HostPaths::for_root(root, original_cwd);

        if let Some(cache_root) = &self.cache_root {
            paths.registries_cache = cache_root.join("registries");
            paths.cache_root = cache_root.clone();
        }
        if let Some(downloads) = &self.downloads {
            paths.downloads = downloads.clone();
        }
        if let Some(artifacts_root) = &self.artifacts_root {
            paths.artifacts_root = artifacts_root.clone();
        }
        if let Some(registries_cache) = &self.registries_cache {
            paths.registries_cache = registries_cache.clone();
        }
        if let Some(global_config) = &self.global_config {
            paths.global_config = global_config.clone();
        }
        paths
    }
}
