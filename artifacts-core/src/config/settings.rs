//! Run-time flags for a single configure-environment invocation.

/// Host flags threaded explicitly into the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Forward `--debug` to the delegated tool.
    pub debug: bool,
    /// Ask the delegated tool for a telemetry file and harvest it.
    pub metrics_enabled: bool,
}

impl Settings {
    /// Creates settings from the host's flags.
    pub fn new(debug: bool, metrics_enabled: bool) -> Self {
        Self {
            debug,
            metrics_enabled,
        }
    }
}
