//! Report Data Structures

use chrono::{DateTime, Utc};
use gmmbench_core::{BenchError, RunMetrics};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete report for one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Version, timestamp and host
    pub meta: ReportMeta,
    /// Dataset path as given
    pub dataset: String,
    /// Samples x features, when the dataset could be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_shape: Option<DatasetShape>,
    /// Raw option string
    pub options: String,
    /// Backend that built the model
    pub backend: String,
    /// Outcome category
    pub status: RunStatus,
    /// Value handed back to the benchmark runner
    pub metrics: RunMetrics,
    /// Error kind and message for failed runs
    pub failure: Option<FailureInfo>,
}

impl RunReport {
    /// Build a report from the outcome of `BenchmarkAdapter::try_run`.
    pub fn from_outcome(
        meta: ReportMeta,
        dataset: impl Into<String>,
        options: impl Into<String>,
        backend: impl Into<String>,
        outcome: &Result<Duration, BenchError>,
    ) -> Self {
        let (status, metrics, failure) = match outcome {
            Ok(elapsed) => (RunStatus::Passed, RunMetrics::from_elapsed(*elapsed), None),
            Err(err) => {
                let status = if err.is_validation() {
                    RunStatus::Invalid
                } else if err.is_timeout() {
                    RunStatus::TimedOut
                } else {
                    RunStatus::Failed
                };
                let failure = FailureInfo {
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                };
                (status, RunMetrics::failed(), Some(failure))
            }
        };

        Self {
            meta,
            dataset: dataset.into(),
            dataset_shape: None,
            options: options.into(),
            backend: backend.into(),
            status,
            metrics,
            failure,
        }
    }

    /// Record the dataset dimensions
    pub fn with_dataset_shape(mut self, shape: Option<DatasetShape>) -> Self {
        self.dataset_shape = shape;
        self
    }
}

/// Dimensions of the fitted matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    /// Rows
    pub samples: usize,
    /// Columns
    pub features: usize,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// gmmbench version
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Host the fit ran on
    pub system: SystemInfo,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// `std::env::consts::OS`
    pub os: String,
    /// `std::env::consts::ARCH`
    pub arch: String,
    /// CPU model name, "Unknown" off Linux
    pub cpu: String,
    /// Available parallelism
    pub cpu_cores: u32,
    /// Total memory in GiB, 0 when unknown
    pub memory_gb: f64,
}

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Fit completed and was timed
    Passed,
    /// Options were rejected before anything ran
    Invalid,
    /// Loading or fitting failed
    Failed,
    /// The run exceeded its timeout
    TimedOut,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Short category, e.g. `invalid_options` or `timeout`
    pub kind: String,
    /// Error message
    pub message: String,
}
