#![warn(missing_docs)]
//! gmmbench Report - Output Formats
//!
//! Generates output for a single benchmark run:
//! - Metrics (the `{"Runtime": t}` / sentinel value a runner consumes)
//! - JSON (full machine-readable report)
//! - Human-readable terminal summary

mod human;
mod json;
mod report;

pub use human::format_human_output;
pub use json::{generate_json_report, generate_metrics_json};
pub use report::{DatasetShape, FailureInfo, ReportMeta, RunReport, RunStatus, SystemInfo};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Runner-facing metrics value only
    Json,
    /// Full JSON report
    Report,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "metrics" => Ok(OutputFormat::Json),
            "report" => Ok(OutputFormat::Report),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render `report` in the requested format
pub fn render(report: &RunReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => generate_metrics_json(&report.metrics).map(|s| s + "\n"),
        OutputFormat::Report => generate_json_report(report).map(|s| s + "\n"),
        OutputFormat::Human => Ok(format_human_output(report)),
    }
}
