//! Wall-Clock Timing
//!
//! Only the fit call is timed. Time is read through the [`Clock`] trait so the
//! adapter can be handed any time source; [`MonotonicClock`] wraps
//! `std::time::Instant` and is the default.

use std::time::Duration;

/// Source of monotonic time readings.
pub trait Clock: Send + Sync {
    /// Time elapsed since a fixed, clock-specific origin.
    fn now(&self) -> Duration;
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Timer for measuring a single fit
pub struct Timer<'a> {
    clock: &'a dyn Clock,
    start: Duration,
}

impl<'a> Timer<'a> {
    /// Start a new timer on `clock`
    #[inline(always)]
    pub fn start(clock: &'a dyn Clock) -> Self {
        Self {
            start: clock.now(),
            clock,
        }
    }

    /// Stop the timer and return the elapsed time
    #[inline(always)]
    pub fn stop(self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }
}

/// Run `f` between a start/stop pair and return its output with the elapsed time.
///
/// The timer stops as soon as `f` returns, whether its output is a success or not.
pub fn time<T>(clock: &dyn Clock, f: impl FnOnce() -> T) -> (T, Duration) {
    let timer = Timer::start(clock);
    let out = f();
    (out, timer.stop())
}
