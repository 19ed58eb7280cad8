//! The Node.js runtime that unpacks and runs the bundle.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ProvisionError;

#[cfg(windows)]
const NODE_EXE: &str = "node.exe";

#[cfg(not(windows))]
const NODE_EXE: &str = "node";

/// A node executable and the npm installation shipped next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRuntime {
    node: PathBuf,
}

impl NodeRuntime {
    pub fn new(node: impl Into<PathBuf>) -> Self {
        Self { node: node.into() }
    }

    /// Finds `node` on `PATH`.
    pub fn discover() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        Self::discover_in(&path)
    }

    /// Finds `node` in the given `PATH`-style list.
    pub fn discover_in(path: &OsStr) -> Option<Self> {
        std::env::split_paths(path)
            .map(|dir| dir.join(NODE_EXE))
            .find(|candidate| candidate.is_file())
            .map(|node| {
                debug!("Found node at {}", node.display());
                Self::new(node)
            })
    }

    /// Path of the node executable.
    pub fn node_path(&self) -> &Path {
        &self.node
    }

    /// Directory containing the node executable.
    pub fn node_root(&self) -> &Path {
        self.node.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Locates npm's CLI entry point.
    ///
    /// Windows distributions ship it as `{root}/node_modules/npm`; Unix
    /// distributions as `{root}/../lib/node_modules/npm`.
    pub fn npm_cli_path(&self) -> Result<PathBuf, ProvisionError> {
        let root = self.node_root();
        let beside = npm_cli_below(root);
        if beside.exists() {
            return Ok(beside);
        }

        if let Some(prefix) = root.parent() {
            let lib = npm_cli_below(&prefix.join("lib"));
            if lib.exists() {
                return Ok(lib);
            }
        }

        Err(ProvisionError::NpmNotFound {
            node_root: root.to_path_buf(),
        })
    }
}

fn npm_cli_below(dir: &Path) -> PathBuf {
    dir.join("node_modules")
        .join("npm")
        .join("bin")
        .join("npm-cli.js")
}
