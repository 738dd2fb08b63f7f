//! Run Metrics
//!
//! The value handed back to a benchmark runner: `{"Runtime": <seconds>}` when
//! the fit completed, or a negative sentinel when it did not.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Value reported for any failed run
pub const FAILURE_SENTINEL: f64 = -1.0;

/// Outcome of a single benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunMetrics {
    /// Fit completed; wall-clock seconds spent in the fit call
    Measured {
        /// Seconds, serialized as `Runtime`
        #[serde(rename = "Runtime")]
        runtime: f64,
    },
    /// Run failed; always [`FAILURE_SENTINEL`]
    Failed(f64),
}

impl RunMetrics {
    /// Metrics for a completed fit
    pub fn from_elapsed(elapsed: Duration) -> Self {
        RunMetrics::Measured {
            runtime: elapsed.as_secs_f64(),
        }
    }

    /// Metrics for a failed run
    pub fn failed() -> Self {
        RunMetrics::Failed(FAILURE_SENTINEL)
    }

    /// Measured runtime in seconds, if the run succeeded
    pub fn runtime(&self) -> Option<f64> {
        match self {
            RunMetrics::Measured { runtime } => Some(*runtime),
            RunMetrics::Failed(_) => None,
        }
    }

    /// Whether the run produced a runtime
    pub fn is_success(&self) -> bool {
        matches!(self, RunMetrics::Measured { .. })
    }

    /// Runtime in seconds, or the sentinel
    pub fn value(&self) -> f64 {
        match self {
            RunMetrics::Measured { runtime } => *runtime,
            RunMetrics::Failed(sentinel) => *sentinel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured() {
        let metrics = RunMetrics::from_elapsed(Duration::from_millis(1500));
        assert!(metrics.is_success());
        assert_eq!(metrics.runtime(), Some(1.5));
        assert_eq!(metrics.value(), 1.5);
    }

    #[test]
    fn test_failed() {
        let metrics = RunMetrics::failed();
        assert!(!metrics.is_success());
        assert_eq!(metrics.runtime(), None);
        assert!(metrics.value() < 0.0);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&RunMetrics::from_elapsed(Duration::from_millis(250))).unwrap();
        assert_eq!(json, r#"{"Runtime":0.25}"#);

        let json = serde_json::to_string(&RunMetrics::failed()).unwrap();
        assert_eq!(json, "-1.0");

        let parsed: RunMetrics = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, RunMetrics::failed());
        let parsed: RunMetrics = serde_json::from_str(r#"{"Runtime": 2.0}"#).unwrap();
        assert_eq!(parsed.runtime(), Some(2.0));
    }
}
