//! Subprocess execution.
//!
//! A [`CommandLine`] describes a process to run; a [`ProcessRunner`] runs it
//! to completion and reports the exit code. Standard streams are inherited
//! so the child talks to the user directly.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::debug;

/// A process invocation: program, arguments, working directory and
/// environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
    /// Variables set on top of the inherited environment.
    pub env: BTreeMap<String, OsString>,
}

impl CommandLine {
    /// Starts a command line for `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a flag followed by its value.
    pub fn flag(&mut self, name: &str, value: impl Into<OsString>) -> &mut Self {
        self.arg(name).arg(value)
    }

    /// Appends arguments in order.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(&mut self, key: impl Into<String>, value: impl Into<OsString>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Arguments as lossy UTF-8 strings, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Runs processes synchronously from the caller's point of view.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` to completion and returns its exit code.
    ///
    /// Fails only when the process cannot be started or waited on.
    async fn run(&self, command: &CommandLine) -> io::Result<i32>;
}

/// Exit code reported for a child that ended without one (killed by a
/// signal on Unix).
const NO_EXIT_CODE: i32 = 1;

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<i32> {
        debug!(
            program = %command.program.display(),
            args = ?command.args_lossy(),
            cwd = ?command.working_dir,
            "Running process"
        );

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .envs(&command.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await?;
        debug!(?status, "Process exited");
        Ok(status.code().unwrap_or(NO_EXIT_CODE))
    }
}
