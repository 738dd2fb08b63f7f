//! JSON Output

use crate::report::RunReport;
use gmmbench_core::RunMetrics;

/// Generate a prettified JSON report.
///
/// Serializes the full run report (metadata, options, status, failure).
pub fn generate_json_report(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Serialize only the runner-facing value: `{"Runtime": t}` or the sentinel.
pub fn generate_metrics_json(metrics: &RunMetrics) -> Result<String, serde_json::Error> {
    serde_json::to_string(metrics)
}
