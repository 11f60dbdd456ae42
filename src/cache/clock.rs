//! Clock Module
//!
//! Elapsed-time sources used as the basis for expiry comparisons.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// == Clock Trait ==
/// Monotonic, non-decreasing elapsed time since the clock was created.
pub trait Clock {
    /// Time elapsed since the clock origin.
    fn elapsed(&self) -> Duration;

    /// Lets `duration` pass on this clock.
    fn wait(&self, duration: Duration);
}

// == Monotonic Clock ==
/// Wall-independent clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same offset, so a test can keep a handle while the
/// cache owns another. Not `Send`: a cache is single-owner.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock at elapsed time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    /// Moves the clock to `elapsed`. Earlier instants are ignored.
    pub fn set(&self, elapsed: Duration) {
        if elapsed > self.offset.get() {
            self.offset.set(elapsed);
        }
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    fn wait(&self, duration: Duration) {
        self.advance(duration);
    }
}
