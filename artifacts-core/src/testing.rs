//! Test doubles for the collaborator seams.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::invocation::IdGenerator;
use crate::process::{CommandLine, ProcessRunner};
use crate::provisioning::{Downloader, NodeRuntime};
use crate::telemetry::{MetricsSink, StringMetric};

/// Creates a node executable with an npm installation beside it.
pub fn fake_node(root: &Path) -> NodeRuntime {
    let node = root.join("node");
    let npm = root.join("node_modules/npm/bin/npm-cli.js");
    std::fs::create_dir_all(npm.parent().unwrap()).unwrap();
    std::fs::write(&node, "").unwrap();
    std::fs::write(&npm, "").unwrap();
    NodeRuntime::new(node)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCall {
    pub uri: String,
    pub sha256: Option<String>,
    pub dest: PathBuf,
}

enum DownloadBehavior {
    Write(Vec<u8>),
    WriteNothing,
    Fail(String),
    WriteThenFail(Vec<u8>, String),
}

/// Downloader that records calls instead of touching the network.
pub struct StubDownloader {
    behavior: DownloadBehavior,
    calls: Mutex<Vec<DownloadCall>>,
}

impl StubDownloader {
    pub fn writing(content: &[u8]) -> Self {
        Self::with(DownloadBehavior::Write(content.to_vec()))
    }

    /// Reports success without creating the destination file.
    pub fn writing_nothing() -> Self {
        Self::with(DownloadBehavior::WriteNothing)
    }

    pub fn failing(message: &str) -> Self {
        Self::with(DownloadBehavior::Fail(message.to_string()))
    }

    /// Writes part of the archive, then reports a transport error.
    pub fn failing_after_writing(partial: &[u8], message: &str) -> Self {
        Self::with(DownloadBehavior::WriteThenFail(
            partial.to_vec(),
            message.to_string(),
        ))
    }

    fn with(behavior: DownloadBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DownloadCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for StubDownloader {
    async fn download(
        &self,
        uri: &str,
        expected_sha256: Option<&str>,
        dest: &Path,
    ) -> anyhow::Result<u64> {
        self.calls.lock().unwrap().push(DownloadCall {
            uri: uri.to_string(),
            sha256: expected_sha256.map(str::to_string),
            dest: dest.to_path_buf(),
        });

        match &self.behavior {
            DownloadBehavior::Write(content) => {
                std::fs::create_dir_all(dest.parent().unwrap())?;
                std::fs::write(dest, content)?;
                Ok(content.len() as u64)
            }
            DownloadBehavior::WriteNothing => Ok(0),
            DownloadBehavior::Fail(message) => Err(anyhow::anyhow!(message.clone())),
            DownloadBehavior::WriteThenFail(partial, message) => {
                std::fs::create_dir_all(dest.parent().unwrap())?;
                std::fs::write(dest, partial)?;
                Err(anyhow::anyhow!(message.clone()))
            }
        }
    }
}

/// Process runner that records command lines and returns a fixed result.
pub struct RecordingRunner {
    exit_code: Option<i32>,
    /// Files created relative to the working directory on each run.
    creates: Vec<String>,
    /// Telemetry written to the path following `--z-telemetry-file`.
    telemetry: Option<String>,
    calls: Mutex<Vec<CommandLine>>,
}

impl RecordingRunner {
    pub fn exiting(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            creates: Vec::new(),
            telemetry: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_to_spawn() -> Self {
        Self {
            exit_code: None,
            ..Self::exiting(0)
        }
    }

    pub fn creating(mut self, relative: &str) -> Self {
        self.creates.push(relative.to_string());
        self
    }

    pub fn writing_telemetry(mut self, json: &str) -> Self {
        self.telemetry = Some(json.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<i32> {
        self.calls.lock().unwrap().push(command.clone());

        let Some(code) = self.exit_code else {
            return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
        };

        if let Some(dir) = &command.working_dir {
            for relative in &self.creates {
                let path = dir.join(relative);
                std::fs::create_dir_all(path.parent().unwrap())?;
                std::fs::write(path, "")?;
            }
        }

        if let Some(json) = &self.telemetry {
            let args = command.args_lossy();
            if let Some(pos) = args.iter().position(|a| a == "--z-telemetry-file") {
                std::fs::write(&args[pos + 1], json)?;
            }
        }

        Ok(code)
    }
}

/// Metrics sink that remembers every tracked value.
#[derive(Default)]
pub struct RecordingMetrics {
    tracked: Mutex<Vec<(StringMetric, String)>>,
}

impl RecordingMetrics {
    pub fn tracked(&self) -> Vec<(StringMetric, String)> {
        self.tracked.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn track_string(&self, metric: StringMetric, value: &str) {
        self.tracked
            .lock()
            .unwrap()
            .push((metric, value.to_string()));
    }
}

/// Id generator that always returns the same value.
pub struct FixedIds(pub &'static str);

impl IdGenerator for FixedIds {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}
