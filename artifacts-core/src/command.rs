//! The configure-environment command.
//!
//! Provisions the vcpkg-artifacts bundle if needed, runs it under node with
//! the user's arguments plus the host's coordination flags, and forwards its
//! telemetry to the host's metrics once it exits.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{HostPaths, Settings};
use crate::error::CommandError;
use crate::invocation::{IdGenerator, InvocationBuilder, UuidGenerator};
use crate::process::ProcessRunner;
use crate::provisioning::{BundleInstaller, Downloader, NodeRuntime, ResolvedBundle};
use crate::telemetry::{harvest_telemetry, MetricsSink};

/// Runs vcpkg-artifacts on behalf of the host.
pub struct ConfigureEnvironment {
    settings: Settings,
    paths: HostPaths,
    bundle: ResolvedBundle,
    runtime: NodeRuntime,
    installer: BundleInstaller,
    runner: Arc<dyn ProcessRunner>,
    metrics: Arc<dyn MetricsSink>,
    ids: Arc<dyn IdGenerator>,
    messages: Option<String>,
}

impl ConfigureEnvironment {
    pub fn new(
        settings: Settings,
        paths: HostPaths,
        bundle: ResolvedBundle,
        runtime: NodeRuntime,
        downloader: Arc<dyn Downloader>,
        runner: Arc<dyn ProcessRunner>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let installer = BundleInstaller::new(
            downloader,
            Arc::clone(&runner),
            runtime.clone(),
            paths.downloads.clone(),
        );
        Self {
            settings,
            paths,
            bundle,
            runtime,
            installer,
            runner,
            metrics,
            ids: Arc::new(UuidGenerator),
            messages: None,
        }
    }

    /// Replaces the source of scratch file names.
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Message catalog forwarded to the child as `--language`.
    pub fn with_messages(mut self, messages: Option<String>) -> Self {
        self.messages = messages;
        self
    }

    /// Runs vcpkg-ce with `args` and returns its exit code.
    pub async fn run(&self, args: &[String]) -> Result<i32, CommandError> {
        warn!("vcpkg-artifacts is experimental and may change at any time.");

        let entry = self.installer.ensure_installed(&self.bundle).await?;
        self.paths.ensure_temp_dir().await?;

        let invocation = InvocationBuilder::new(
            &self.runtime,
            &self.paths,
            self.settings,
            self.ids.as_ref(),
        )
        .messages(self.messages.as_deref())
        .build(&entry, args)
        .await?;

        let code = self
            .runner
            .run(&invocation.command)
            .await
            .map_err(CommandError::Delegation)?;
        debug!("vcpkg-artifacts exited with code {}", code);

        if let Some(path) = &invocation.telemetry_file {
            harvest_telemetry(path, self.metrics.as_ref()).await;
        }

        Ok(code)
    }

    /// Runs an artifacts subcommand, e.g. `activate`, with `args`.
    pub async fn run_subcommand(&self, subcommand: &str, args: &[String]) -> Result<i32, CommandError> {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(subcommand.to_string());
        all.extend_from_slice(args);
        self.run(&all).await
    }
}

/// Maps a command result to the host's exit code, reporting any error.
pub fn exit_code(result: Result<i32, CommandError>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}
