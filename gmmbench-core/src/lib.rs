#![warn(missing_docs)]
//! gmmbench Core - Benchmark Runtime
//!
//! This crate provides everything needed to time one Gaussian Mixture Model fit:
//! - `OptionSet` parsing from a flat option string (`-g 3 --covariance_type diag`)
//! - Numeric CSV loading into an `ndarray` matrix
//! - `GmmBackend` adapters over external GMM libraries (linfa, optionally aprender)
//! - Wall-clock timing through an injectable `Clock`
//! - A timeout worker that abandons runs exceeding their bound
//! - `BenchmarkAdapter`, which ties these together and reports `RunMetrics`

mod adapter;
mod backend;
mod dataset;
mod measure;
mod metrics;
mod options;
mod worker;

pub use adapter::{BenchError, BenchmarkAdapter};
pub use backend::{FitError, GmmBackend, LibraryBackend, LinfaBackend, PreparedFit};
pub use dataset::{DatasetError, load_csv, parse_csv};
pub use measure::{Clock, MonotonicClock, Timer, time};
pub use metrics::{FAILURE_SENTINEL, RunMetrics};
pub use options::{CovarianceType, InitMethod, OptionError, OptionSet};
pub use worker::{WorkerError, run_inline, run_with_timeout};

#[cfg(feature = "aprender")]
pub use backend::AprenderBackend;
