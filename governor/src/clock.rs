//! Time source for pacing decisions.

use std::time::Duration;
use tokio::time::Instant;

/// Monotonic time plus the ability to wait.
///
/// `now` is an offset from an arbitrary origin fixed at construction; only
/// differences between readings are meaningful.
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// Wall-clock implementation backed by `tokio::time`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn system_clock_advances_across_sleep() {
        let clock = SystemClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_secs(15)).await;
        assert!(clock.now() - before >= Duration::from_secs(15));
    }
}
