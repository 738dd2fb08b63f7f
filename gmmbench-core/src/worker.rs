//! Timeout Worker
//!
//! Runs a benchmark job either inline or on a dedicated thread bounded by a
//! timeout. The threaded path hands its result back through a single-slot
//! channel. On timeout the caller stops waiting and the thread is detached:
//! the job keeps running until the library returns, there is no way to
//! interrupt numeric code mid-computation.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Failure of the job runner itself
#[derive(Debug, Error)]
pub enum WorkerError {
    /// No result within the bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The job panicked
    #[error("Worker panicked: {0}")]
    Panicked(String),

    /// The worker thread ended without sending
    #[error("Worker exited without reporting a result")]
    Disconnected,

    /// The worker thread could not be started
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

/// Run `job` on the current thread, converting a panic into [`WorkerError::Panicked`].
pub fn run_inline<T>(job: impl FnOnce() -> T) -> Result<T, WorkerError> {
    catch_unwind(AssertUnwindSafe(job)).map_err(|panic| WorkerError::Panicked(panic_message(panic)))
}

/// Run `job` bounded by `timeout`.
///
/// `None` or a zero timeout runs the job inline. Otherwise the job runs on a
/// `gmmbench-worker` thread that inherits the caller's tracing dispatcher.
pub fn run_with_timeout<T, F>(timeout: Option<Duration>, job: F) -> Result<T, WorkerError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let Some(timeout) = timeout.filter(|t| !t.is_zero()) else {
        return run_inline(job);
    };

    let dispatch = tracing::dispatcher::get_default(|d| d.clone());
    let (tx, rx) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name("gmmbench-worker".to_string())
        .spawn(move || {
            let outcome = tracing::dispatcher::with_default(&dispatch, || run_inline(job));
            // The receiver is gone once the caller has given up.
            let _ = tx.send(outcome);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!(?timeout, "abandoning worker thread");
            Err(WorkerError::Timeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
