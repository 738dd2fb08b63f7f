//! Human-readable Output

use crate::report::{RunReport, RunStatus};

/// Format a report for terminal display
pub fn format_human_output(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("gmmbench\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("  dataset: {}\n", report.dataset));
    if let Some(shape) = report.dataset_shape {
        output.push_str(&format!("  shape: {} x {}\n", shape.samples, shape.features));
    }
    if !report.options.trim().is_empty() {
        output.push_str(&format!("  options: {}\n", report.options.trim()));
    }
    output.push_str(&format!("  backend: {}\n", report.backend));

    let status_icon = match report.status {
        RunStatus::Passed => "✓",
        RunStatus::Invalid => "⊘",
        RunStatus::Failed => "✗",
        RunStatus::TimedOut => "⏱",
    };

    match report.metrics.runtime() {
        Some(runtime) => {
            output.push_str(&format!("  {} Runtime: {:.6} s\n", status_icon, runtime));
        }
        None => {
            output.push_str(&format!(
                "  {} failed ({})\n",
                status_icon,
                report.metrics.value()
            ));
            if let Some(failure) = &report.failure {
                output.push_str(&format!("      {}: {}\n", failure.kind, failure.message));
            }
        }
    }

    output
}
