#![warn(missing_docs)]
//! # gmmbench
//!
//! Times a single Gaussian Mixture Model fit on a CSV dataset and reports the
//! result the way benchmark runners expect it: `{"Runtime": seconds}` on
//! success, the failure sentinel `-1.0` otherwise.
//!
//! - **Option strings**: `-g 3 --covariance_type diag -s 7` style flags with
//!   documented defaults; bad enum values fail before anything is timed
//! - **Fit-only timing**: loading the dataset and building the model are not timed
//! - **Timeouts**: runs can be bounded; a run over the bound reports the sentinel
//! - **Injection**: logger (`tracing::Dispatch`), clock and GMM backend are
//!   builder parameters of [`BenchmarkAdapter`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use gmmbench::BenchmarkAdapter;
//! use std::time::Duration;
//!
//! let adapter = BenchmarkAdapter::new("data.csv").with_timeout(Duration::from_secs(30));
//! let metrics = adapter.run_metrics("-g 2 --covariance_type full -s 42");
//! println!("{}", serde_json::to_string(&metrics).unwrap());
//! ```
//!
//! ## Covariance structures
//!
//! `full` fits with linfa. `tied`, `diag` and `spherical` fit with aprender
//! through the default `aprender` feature; a build with
//! `--no-default-features` reports them as unsupported.

// Re-export core types
pub use gmmbench_core::{
    BenchError, BenchmarkAdapter, Clock, CovarianceType, DatasetError, FAILURE_SENTINEL, FitError,
    GmmBackend, InitMethod, LibraryBackend, LinfaBackend, MonotonicClock, OptionError, OptionSet,
    PreparedFit, RunMetrics, WorkerError, load_csv,
};

#[cfg(feature = "aprender")]
pub use gmmbench_core::AprenderBackend;

// Re-export report types
pub use gmmbench_report::{DatasetShape, OutputFormat, RunReport, RunStatus, render};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BenchmarkAdapter, CovarianceType, OptionSet, RunMetrics};
}

/// Run the gmmbench CLI harness.
///
/// ```no_run
/// fn main() {
///     if let Err(e) = gmmbench::run() {
///         eprintln!("Error: {}", e);
///         std::process::exit(2);
///     }
/// }
/// ```
pub use gmmbench_cli::run;
