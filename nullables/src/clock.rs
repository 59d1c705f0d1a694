//! Nullable clock: deterministic time for testing.

use kyc_governor::Clock;
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, or when something sleeps on it.
/// Every sleep is recorded so tests can assert on the pacing schedule.
pub struct NullClock {
    current: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl NullClock {
    pub fn new() -> Self {
        Self {
            current: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Advance time without recording a sleep (simulates time spent working).
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Every non-zero sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    /// Sum of all sleeps.
    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for NullClock {
    fn now(&self) -> Duration {
        self.current.get()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            self.sleeps.borrow_mut().push(duration);
            self.advance(duration);
        }
    }
}
