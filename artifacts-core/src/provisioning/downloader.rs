//! Bundle download transport.
//!
//! [`HttpDownloader`] streams the archive with reqwest, validates the URL
//! against an allow list and verifies the optional SHA-256 checksum. The
//! [`Downloader`] trait is the seam the installer depends on.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

// ============================================================================
// Transport Seam
// ============================================================================

/// Fetches a remote file to a local path.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `uri` to `dest`, verifying `expected_sha256` when given.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, uri: &str, expected_sha256: Option<&str>, dest: &Path) -> Result<u64>;
}

// ============================================================================
// URL Security Validation
// ============================================================================

/// Allowed domains for downloading the bundle.
const ALLOWED_DOMAINS: &[&str] = &["github.com"];

/// Validates that a URL is safe for downloading.
///
/// Checks:
/// - URL scheme must be HTTPS
/// - Host must be in the allowed domain list
fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str).with_context(|| format!("Invalid URL: {}", url_str))?;

    if url.scheme() != "https" {
        anyhow::bail!("URL must use HTTPS: {}", url_str);
    }

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("URL must have a host: {}", url_str))?;

    // Subdomains of an allowed domain are accepted too
    let is_allowed = ALLOWED_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));

    if !is_allowed {
        anyhow::bail!(
            "Download domain not allowed: {}. Allowed: {:?}",
            host,
            ALLOWED_DOMAINS
        );
    }

    Ok(())
}

// ============================================================================
// HTTP Downloader
// ============================================================================

/// Streaming HTTPS downloader with checksum verification.
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    /// Creates a downloader with a default reqwest client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, uri: &str, expected_sha256: Option<&str>, dest: &Path) -> Result<u64> {
        info!("Downloading {} to {}", uri, dest.display());

        validate_url(uri)?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let response = self
            .client
            .get(uri)
            .send()
            .await
            .with_context(|| format!("Failed to start download from {}", uri))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "Download failed with status {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            );
        }

        debug!("Content-Length: {:?}", response.content_length());

        let mut file = File::create(dest)
            .await
            .with_context(|| format!("Failed to create file: {}", dest.display()))?;

        let mut stream = response.bytes_stream();
        let mut bytes_downloaded: u64 = 0;
        let mut hasher = Sha256::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.context("Failed to read chunk from response stream")?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .context("Failed to write chunk to file")?;
            bytes_downloaded += chunk.len() as u64;
        }

        file.flush().await.context("Failed to flush file")?;
        drop(file);

        if let Some(expected) = expected_sha256 {
            let actual_hex = format_sha256_hex(&hasher.finalize());
            if !actual_hex.eq_ignore_ascii_case(expected) {
                // A mismatching archive must never reach the unpack step
                let _ = tokio::fs::remove_file(dest).await;
                anyhow::bail!(
                    "SHA256 checksum mismatch!\nExpected: {}\nActual: {}",
                    expected,
                    actual_hex
                );
            }
            debug!("SHA256 verified: {}", actual_hex);
        }

        info!(
            "Download complete: {} bytes written to {}",
            bytes_downloaded,
            dest.display()
        );
        Ok(bytes_downloaded)
    }
}

/// Formats a SHA256 hash as lowercase hex.
fn format_sha256_hex(hash: &[u8]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}
