//! Metrics sink for the standalone binary.

use artifacts_core::{MetricsSink, StringMetric};
use tracing::debug;

/// Emits tracked metrics as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn track_string(&self, metric: StringMetric, value: &str) {
        debug!(metric = %metric, value, "Tracked artifacts metric");
    }
}
