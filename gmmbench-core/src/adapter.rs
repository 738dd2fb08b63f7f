//! Benchmark Adapter
//!
//! Runs one timed GMM fit per call:
//!
//! ```text
//!  option string
//!       │  OptionSet::parse        (validation failure → sentinel, nothing timed)
//!       ▼
//! ┌──────────────────────┐
//! │ worker (timeout > 0) │  load CSV → prepare model → [timer] fit [timer]
//! │ or caller's thread   │
//! └──────────┬───────────┘
//!            ▼
//!  RunMetrics::Measured { runtime } | RunMetrics::Failed(-1.0)
//! ```
//!
//! The logger (a `tracing::Dispatch`), the clock and the GMM backend are all
//! injected through builder methods. Errors are logged by kind and returned
//! from [`BenchmarkAdapter::try_run`]; [`BenchmarkAdapter::run_metrics`]
//! collapses every failure into the sentinel.

use crate::backend::{FitError, GmmBackend, LibraryBackend};
use crate::dataset::{DatasetError, load_csv};
use crate::measure::{self, Clock, MonotonicClock};
use crate::metrics::RunMetrics;
use crate::options::{OptionError, OptionSet};
use crate::worker::{WorkerError, run_with_timeout};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Dispatch;

/// Why a run produced the failure sentinel
#[derive(Debug, Error)]
pub enum BenchError {
    /// The option string was rejected; nothing ran
    #[error("{0}")]
    Options(#[from] OptionError),

    /// The dataset could not be loaded
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Model construction or the fit failed
    #[error(transparent)]
    Fit(#[from] FitError),

    /// The run timed out or its worker died
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl BenchError {
    /// Whether the run was rejected before any work started
    pub fn is_validation(&self) -> bool {
        matches!(self, BenchError::Options(_))
    }

    /// Whether the run was abandoned because it exceeded the timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, BenchError::Worker(WorkerError::Timeout(_)))
    }

    /// Short machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::Options(_) => "invalid_options",
            BenchError::Dataset(_) => "dataset",
            BenchError::Fit(FitError::Unsupported { .. }) => "unsupported",
            BenchError::Fit(_) => "fit",
            BenchError::Worker(WorkerError::Timeout(_)) => "timeout",
            BenchError::Worker(WorkerError::Panicked(_)) => "panic",
            BenchError::Worker(_) => "worker",
        }
    }
}

/// Times GMM fits on a single dataset
pub struct BenchmarkAdapter {
    dataset: PathBuf,
    timeout: Option<Duration>,
    verbose: bool,
    clock: Arc<dyn Clock>,
    backend: Arc<dyn GmmBackend>,
    dispatch: Option<Dispatch>,
}

impl BenchmarkAdapter {
    /// Create an adapter for `dataset` with no timeout, verbose logging, the
    /// monotonic clock and the default library backend. Events go to whatever
    /// dispatcher is current when a run starts.
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            timeout: None,
            verbose: true,
            clock: Arc::new(MonotonicClock::new()),
            backend: Arc::new(LibraryBackend),
            dispatch: None,
        }
    }

    /// Bound each run by `timeout`; zero disables the bound
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Log the informational "Perform GMM." line on each run
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Time source for the fit timer
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Library used to build and fit the model
    pub fn with_backend(mut self, backend: impl GmmBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    /// Logger that receives every event emitted during a run, in place of
    /// the current dispatcher
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Dataset path
    pub fn dataset(&self) -> &Path {
        &self.dataset
    }

    /// Effective timeout; `None` when runs are unbounded
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Name of the configured backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run one benchmark and report `{"Runtime": seconds}` or the failure sentinel.
    pub fn run_metrics(&self, options: &str) -> RunMetrics {
        match self.try_run(options) {
            Ok(elapsed) => RunMetrics::from_elapsed(elapsed),
            Err(_) => RunMetrics::failed(),
        }
    }

    /// Run one benchmark and return the fit time. Failures are logged and keep their kind.
    pub fn try_run(&self, options: &str) -> Result<Duration, BenchError> {
        let run = || {
            self.execute(options).map_err(|err| {
                self.log_failure(&err);
                err
            })
        };
        match self.dispatch {
            Some(ref dispatch) => tracing::dispatcher::with_default(dispatch, run),
            None => run(),
        }
    }

    fn execute(&self, options: &str) -> Result<Duration, BenchError> {
        if self.verbose {
            tracing::info!("Perform GMM.");
        }

        let options = OptionSet::parse(options)?;
        tracing::debug!(?options, backend = self.backend.name(), "parsed GMM options");

        let job = FitJob {
            dataset: self.dataset.clone(),
            options,
            clock: Arc::clone(&self.clock),
            backend: Arc::clone(&self.backend),
        };

        let elapsed = run_with_timeout(self.timeout, move || job.run())??;
        tracing::debug!(elapsed_secs = elapsed.as_secs_f64(), "GMM fit complete");
        Ok(elapsed)
    }

    fn log_failure(&self, err: &BenchError) {
        match err {
            BenchError::Options(e) => tracing::error!("{e}"),
            BenchError::Dataset(e) => {
                tracing::error!(dataset = %self.dataset.display(), "Could not load dataset: {e}")
            }
            BenchError::Fit(e) => tracing::error!("GMM fit failed: {e}"),
            BenchError::Worker(WorkerError::Timeout(timeout)) => {
                tracing::error!(?timeout, "GMM fit exceeded the timeout")
            }
            BenchError::Worker(e) => tracing::error!("GMM worker failed: {e}"),
        }
    }
}

impl fmt::Debug for BenchmarkAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkAdapter")
            .field("dataset", &self.dataset)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("backend", &self.backend.name())
            .field("dispatch", &self.dispatch.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything one run needs, owned so it can move onto a worker thread.
struct FitJob {
    dataset: PathBuf,
    options: OptionSet,
    clock: Arc<dyn Clock>,
    backend: Arc<dyn GmmBackend>,
}

impl FitJob {
    fn run(self) -> Result<Duration, BenchError> {
        let data = load_csv(&self.dataset)?;
        tracing::debug!(samples = data.nrows(), features = data.ncols(), "loaded dataset");

        let model = self.backend.prepare(&self.options)?;
        let (outcome, elapsed) = measure::time(self.clock.as_ref(), || model.fit(data));
        outcome?;

        Ok(elapsed)
    }
}
