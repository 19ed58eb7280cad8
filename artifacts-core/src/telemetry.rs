//! Telemetry written by vcpkg-ce and forwarded to the host's metrics.

use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// String-valued metrics vcpkg-ce reports back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringMetric {
    AcquiredArtifacts,
    ActivatedArtifacts,
}

impl StringMetric {
    /// Key of this metric in the telemetry record.
    pub fn key(self) -> &'static str {
        match self {
            Self::AcquiredArtifacts => "acquired_artifacts",
            Self::ActivatedArtifacts => "activated_artifacts",
        }
    }

    fn absent_message(self) -> &'static str {
        match self {
            Self::AcquiredArtifacts => "No artifacts acquired",
            Self::ActivatedArtifacts => "No artifacts activated",
        }
    }
}

impl fmt::Display for StringMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The host's metrics pipeline.
pub trait MetricsSink: Send + Sync {
    fn track_string(&self, metric: StringMetric, value: &str);
}

/// Reads the telemetry record at `path` and forwards its recognized fields.
///
/// Never fails: unreadable or malformed records only produce debug logs.
pub async fn harvest_telemetry(path: &Path, sink: &dyn MetricsSink) {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Telemetry file couldn't be read: {}", e);
            return;
        }
    };

    let record: Map<String, Value> = match serde_json::from_str(&contents) {
        Ok(Value::Object(record)) => record,
        Ok(_) => {
            debug!("Telemetry file couldn't be parsed: expected a JSON object");
            return;
        }
        Err(e) => {
            debug!("Telemetry file couldn't be parsed: {}", e);
            return;
        }
    };

    for metric in [StringMetric::AcquiredArtifacts, StringMetric::ActivatedArtifacts] {
        match record.get(metric.key()) {
            Some(Value::String(value)) => sink.track_string(metric, value),
            Some(_) => debug!("{} was not a string", metric.key()),
            None => debug!("{}", metric.absent_message()),
        }
    }
}
