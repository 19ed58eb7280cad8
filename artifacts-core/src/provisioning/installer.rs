//! Bundle installation.
//!
//! The installer makes sure the bundle's entry directory exists before the
//! command delegates to it. A failed attempt never leaves a half-populated
//! install base behind: the next run's existence check would otherwise
//! mistake it for a complete installation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::downloader::Downloader;
use super::env::runtime_path_override;
use super::mode::{ProvisioningMode, ResolvedBundle};
use super::runtime::NodeRuntime;
use crate::error::ProvisionError;
use crate::process::{CommandLine, ProcessRunner};

/// Downloads and unpacks the vcpkg-artifacts bundle on demand.
pub struct BundleInstaller {
    downloader: Arc<dyn Downloader>,
    runner: Arc<dyn ProcessRunner>,
    runtime: NodeRuntime,
    /// Directory receiving the transient archive.
    downloads: PathBuf,
}

impl BundleInstaller {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        runner: Arc<dyn ProcessRunner>,
        runtime: NodeRuntime,
        downloads: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            runner,
            runtime,
            downloads: downloads.into(),
        }
    }

    /// Returns the bundle's entry directory, provisioning it first if needed.
    ///
    /// Pinned bundles are reused when their directory exists; the contents
    /// are not re-validated. The latest channel is refreshed on every call.
    pub async fn ensure_installed(&self, bundle: &ResolvedBundle) -> Result<PathBuf, ProvisionError> {
        match &bundle.mode {
            ProvisioningMode::Local(path) => {
                warn!(
                    "Using in-development vcpkg-artifacts built at: {}",
                    path.display()
                );
                return Ok(bundle.tool_dir.clone());
            }
            ProvisioningMode::Pinned { version, .. } => {
                debug!("vcpkg-artifacts base path: {}", bundle.install_base.display());
                if bundle.tool_dir.is_dir() {
                    return Ok(bundle.tool_dir.clone());
                }
                info!("Downloading vcpkg-artifacts bundle {}", version);
            }
            ProvisioningMode::Latest => {
                debug!("vcpkg-artifacts base path: {}", bundle.install_base.display());
                warn!("Downloading latest vcpkg-artifacts bundle");
            }
        }

        self.provision(bundle).await?;
        Ok(bundle.tool_dir.clone())
    }

    async fn provision(&self, bundle: &ResolvedBundle) -> Result<(), ProvisionError> {
        let (Some(uri), Some(archive)) = (
            bundle.mode.download_uri(),
            bundle.archive_path(&self.downloads),
        ) else {
            return Ok(());
        };

        if let Err(source) = self
            .downloader
            .download(&uri, bundle.mode.expected_sha256(), &archive)
            .await
        {
            // The transport may have written part of the archive already.
            remove_archive_if_exists(&archive).await;
            return Err(ProvisionError::Download { uri, source });
        }

        self.unpack(&archive, &bundle.install_base).await
    }

    async fn unpack(&self, archive: &Path, install_base: &Path) -> Result<(), ProvisionError> {
        let is_file = tokio::fs::metadata(archive)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            debug!("Download succeeded but {} isn't present", archive.display());
            return Err(ProvisionError::ArchiveMissing {
                path: archive.to_path_buf(),
            });
        }

        let npm_cli = match self.runtime.npm_cli_path() {
            Ok(path) => path,
            Err(e) => {
                remove_archive(archive).await;
                return Err(e);
            }
        };

        remove_dir_if_exists(install_base).await?;
        tokio::fs::create_dir_all(install_base).await?;

        let mut cmd = CommandLine::new(self.runtime.node_path());
        cmd.arg(&npm_cli)
            .args([
                "--force",
                "install",
                "--no-save",
                "--no-lockfile",
                "--scripts-prepend-node-path=true",
                "--silent",
            ])
            .arg(archive)
            .current_dir(install_base);
        let (key, path) = runtime_path_override(self.runtime.node_root());
        cmd.env(key, path);

        info!("Unpacking {} into {}", archive.display(), install_base.display());
        let outcome = match self.runner.run(&cmd).await {
            Ok(0) => Ok(()),
            Ok(code) => Err(format!("npm exited with code {}", code)),
            Err(e) => Err(format!("failed to start npm: {}", e)),
        };

        remove_archive(archive).await;

        if let Err(reason) = outcome {
            if let Err(e) = remove_dir_if_exists(install_base).await {
                warn!(
                    "Failed to remove partial install at {}: {}",
                    install_base.display(),
                    e
                );
            }
            return Err(ProvisionError::Unpack {
                archive: archive.to_path_buf(),
                reason,
            });
        }

        info!("vcpkg-artifacts installed to {}", install_base.display());
        Ok(())
    }
}

async fn remove_archive(archive: &Path) {
    if let Err(e) = tokio::fs::remove_file(archive).await {
        warn!("Failed to clean up archive {}: {}", archive.display(), e);
    }
}

async fn remove_archive_if_exists(archive: &Path) {
    match tokio::fs::remove_file(archive).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            warn!("Failed to clean up archive {}: {}", archive.display(), e);
        }
        _ => {}
    }
}

async fn remove_dir_if_exists(dir: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::provisioning::mode::resolve;
    use crate::testing::{fake_node, RecordingRunner, StubDownloader};
    use tempfile::TempDir;

    const SHA: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    struct Fixture {
        _temp: TempDir,
        cache: PathBuf,
        downloads: PathBuf,
        node: NodeRuntime,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        let downloads = temp.path().join("downloads");
        let node = fake_node(&temp.path().join("node"));
        Fixture {
            _temp: temp,
            cache,
            downloads,
            node,
        }
    }

    fn installer(
        f: &Fixture,
        downloader: &Arc<StubDownloader>,
        runner: &Arc<RecordingRunner>,
    ) -> BundleInstaller {
        BundleInstaller::new(
            downloader.clone(),
            runner.clone(),
            f.node.clone(),
            &f.downloads,
        )
    }

    #[tokio::test]
    async fn test_existing_pinned_install_skips_download_and_unpack() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);
        std::fs::create_dir_all(&bundle.tool_dir).unwrap();

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0));

        let path = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        assert_eq!(path, bundle.tool_dir);
        assert!(downloader.calls().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_local_mode_does_no_io() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::local("/src/vcpkg-ce"), &f.cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0));

        let path = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("/src/vcpkg-ce"));
        assert!(downloader.calls().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_unpack_removes_archive_and_keeps_install() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0).creating("node_modules/vcpkg-ce/main.js"));

        let path = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        let archive = f.downloads.join("vcpkg-ce-2024.02.14.tgz");
        assert_eq!(path, bundle.tool_dir);
        assert!(bundle.install_base.is_dir());
        assert!(bundle.tool_dir.join("main.js").is_file());
        assert!(!archive.exists());

        let calls = downloader.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].uri,
            "https://github.com/microsoft/vcpkg-tool/releases/download/2024.02.14/vcpkg-ce.tgz"
        );
        assert_eq!(calls[0].sha256.as_deref(), Some(SHA));
        assert_eq!(calls[0].dest, archive);
    }

    #[tokio::test]
    async fn test_unpack_command_line() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::latest("2024.02.14"), &f.cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0));

        installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        let cmd = &calls[0];
        let archive = f.downloads.join("vcpkg-ce-latest.tgz");
        let npm = f.node.npm_cli_path().unwrap();

        assert_eq!(cmd.program, f.node.node_path());
        assert_eq!(
            cmd.args_lossy(),
            vec![
                npm.to_string_lossy().into_owned(),
                "--force".to_string(),
                "install".to_string(),
                "--no-save".to_string(),
                "--no-lockfile".to_string(),
                "--scripts-prepend-node-path=true".to_string(),
                "--silent".to_string(),
                archive.to_string_lossy().into_owned(),
            ]
        );
        assert_eq!(cmd.working_dir.as_deref(), Some(bundle.install_base.as_path()));

        let path = cmd.env.get("PATH").unwrap();
        let first = std::env::split_paths(path).next().unwrap();
        assert_eq!(first, f.node.node_root());
    }

    #[tokio::test]
    async fn test_failed_unpack_removes_install_and_archive() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(1).creating("node_modules/partial.js"));

        let err = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Unpack { .. }));
        assert!(!bundle.install_base.exists());
        assert!(!f.downloads.join("vcpkg-ce-2024.02.14.tgz").exists());
    }

    #[tokio::test]
    async fn test_unpack_spawn_failure_cleans_up() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::latest("2024.02.14"), &f.cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::failing_to_spawn());

        let err = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap_err();

        match err {
            ProvisionError::Unpack { reason, .. } => assert!(reason.contains("failed to start")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!bundle.install_base.exists());
        assert!(!f.downloads.join("vcpkg-ce-latest.tgz").exists());
    }

    #[tokio::test]
    async fn test_stale_install_base_is_replaced() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);
        // Base exists from an earlier, interrupted run but has no tool dir
        std::fs::create_dir_all(&bundle.install_base).unwrap();
        std::fs::write(bundle.install_base.join("stale.txt"), "old").unwrap();

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0).creating("node_modules/vcpkg-ce/main.js"));

        installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        assert!(!bundle.install_base.join("stale.txt").exists());
        assert!(bundle.tool_dir.join("main.js").is_file());
    }

    #[tokio::test]
    async fn test_latest_reprovisions_existing_install() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::latest("2024.02.14"), &f.cache);
        std::fs::create_dir_all(&bundle.tool_dir).unwrap();

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0));

        installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap();

        assert_eq!(downloader.calls().len(), 1);
        assert_eq!(downloader.calls()[0].sha256, None);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_download_failure_is_reported_and_nothing_is_created() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);

        let downloader = Arc::new(StubDownloader::failing("connection reset"));
        let runner = Arc::new(RecordingRunner::exiting(0));

        let err = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Download { .. }));
        assert!(err.to_string().contains("connection reset"));
        assert!(!bundle.install_base.exists());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_interrupted_download_removes_partial_archive() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::latest("2024.02.14"), &f.cache);
        let archive = bundle.archive_path(&f.downloads).unwrap();

        let downloader = Arc::new(StubDownloader::failing_after_writing(
            b"partial tarb",
            "Failed to read chunk from response stream",
        ));
        let runner = Arc::new(RecordingRunner::exiting(0));

        let err = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Download { .. }));
        assert_eq!(downloader.calls()[0].dest, archive);
        assert!(!archive.exists());
        assert!(!bundle.install_base.exists());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_archive_after_download() {
        let f = fixture();
        let bundle = resolve(&BuildConfig::pinned("2024.02.14", SHA), &f.cache);

        let downloader = Arc::new(StubDownloader::writing_nothing());
        let runner = Arc::new(RecordingRunner::exiting(0));

        let err = installer(&f, &downloader, &runner)
            .ensure_installed(&bundle)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::ArchiveMissing { .. }));
        assert!(!bundle.install_base.exists());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_npm_removes_archive_without_touching_install() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        let downloads = temp.path().join("downloads");
        let bundle = resolve(&BuildConfig::latest("2024.02.14"), &cache);

        let downloader = Arc::new(StubDownloader::writing(b"archive"));
        let runner = Arc::new(RecordingRunner::exiting(0));
        let installer = BundleInstaller::new(
            downloader.clone(),
            runner.clone(),
            NodeRuntime::new(temp.path().join("no-node").join("node")),
            &downloads,
        );

        let err = installer.ensure_installed(&bundle).await.unwrap_err();

        assert!(matches!(err, ProvisionError::NpmNotFound { .. }));
        assert!(!downloads.join("vcpkg-ce-latest.tgz").exists());
        assert!(runner.calls().is_empty());
    }
}
