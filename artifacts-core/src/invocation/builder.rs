//! Assembly of the vcpkg-ce command line.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::protocol::CoordinationArgs;
use crate::config::{HostPaths, Settings};
use crate::process::CommandLine;
use crate::provisioning::NodeRuntime;

const TELEMETRY_SUFFIX: &str = "_artifacts_telemetry.txt";
const PREVIOUS_ENVIRONMENT_SUFFIX: &str = "_previous_environment.txt";
const MESSAGES_FILE: &str = "messages.json";

/// Source of unique names for per-invocation scratch files.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A ready-to-run vcpkg-ce invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: CommandLine,
    /// File the child may write telemetry to. `None` when metrics are off.
    pub telemetry_file: Option<PathBuf>,
}

/// Builds the node command line that runs vcpkg-ce on behalf of the user.
pub struct InvocationBuilder<'a> {
    runtime: &'a NodeRuntime,
    paths: &'a HostPaths,
    settings: Settings,
    ids: &'a dyn IdGenerator,
    messages: Option<&'a str>,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(
        runtime: &'a NodeRuntime,
        paths: &'a HostPaths,
        settings: Settings,
        ids: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            runtime,
            paths,
            settings,
            ids,
            messages: None,
        }
    }

    /// Message catalog to hand to the child through `--language`.
    pub fn messages(mut self, messages: Option<&'a str>) -> Self {
        self.messages = messages;
        self
    }

    /// Builds the invocation for the tool installed at `entry`.
    ///
    /// Writes the message catalog into the scratch directory when one was
    /// given. The scratch directory must already exist.
    pub async fn build(&self, entry: &Path, user_args: &[String]) -> io::Result<Invocation> {
        let temp = &self.paths.temp_dir;

        let telemetry_file = self
            .settings
            .metrics_enabled
            .then(|| temp.join(format!("{}{TELEMETRY_SUFFIX}", self.ids.generate())));
        let next_previous_environment = temp.join(format!(
            "{}{PREVIOUS_ENVIRONMENT_SUFFIX}",
            self.ids.generate()
        ));

        let language_file = match self.messages {
            Some(messages) => {
                let path = temp.join(MESSAGES_FILE);
                tokio::fs::write(&path, messages).await?;
                Some(path)
            }
            None => None,
        };

        let coordination = CoordinationArgs {
            debug: self.settings.debug,
            telemetry_file: telemetry_file.clone(),
            vcpkg_root: self.paths.root.clone(),
            vcpkg_command: self.paths.self_exe.clone(),
            artifacts_root: self.paths.artifacts_root.clone(),
            downloads: self.paths.downloads.clone(),
            registries_cache: self.paths.registries_cache.clone(),
            next_previous_environment,
            global_config: self.paths.global_config.clone(),
            language_file,
        };

        let mut command = CommandLine::new(self.runtime.node_path());
        command
            .arg(entry)
            .args(user_args)
            .current_dir(&self.paths.original_cwd);
        coordination.write_to(&mut command);

        debug!(args = ?command.args_lossy(), "Built vcpkg-ce invocation");

        Ok(Invocation {
            command,
            telemetry_file,
        })
    }
}
