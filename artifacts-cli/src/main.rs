//! vcpkg-artifacts CLI
//!
//! Standalone host for vcpkg's configure-environment command: provisions
//! the vcpkg-ce bundle and runs it with the forwarded arguments.

mod cli;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use artifacts_core::{
    exit_code, resolve, BuildConfig, ConfigureEnvironment, HttpDownloader, NodeRuntime,
    SystemProcessRunner, INTERNAL_ERROR_EXIT_CODE,
};
use cli::Cli;
use metrics::TracingMetrics;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    tracing::debug!("Starting vcpkg-artifacts v{}", artifacts_core::VERSION);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            INTERNAL_ERROR_EXIT_CODE
        }
    };
    std::process::exit(code);
}

/// Logs go to stderr so they never mix with vcpkg-ce's own output.
fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    // vcpkg-ce owns the terminal while it runs; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let original_cwd = std::env::current_dir().context("Failed to read current directory")?;
    let paths = cli.host_paths(original_cwd);

    let node = match &cli.node {
        Some(path) => NodeRuntime::new(path),
        None => NodeRuntime::discover()
            .context("node was not found on PATH; pass --node or set VCPKG_NODE")?,
    };

    let messages = cli
        .language
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read message catalog {}", path.display()))
        })
        .transpose()?;

    let bundle = resolve(&BuildConfig::from_build_env(), &paths.cache_root);
    tracing::debug!(mode = %bundle.mode, "Resolved vcpkg-artifacts bundle");

    let command = ConfigureEnvironment::new(
        cli.settings(),
        paths,
        bundle,
        node,
        Arc::new(HttpDownloader::new()),
        Arc::new(SystemProcessRunner),
        Arc::new(TracingMetrics),
    )
    .with_messages(messages);

    let result = runtime.block_on(command.run(&cli.args));
    Ok(exit_code(result))
}
