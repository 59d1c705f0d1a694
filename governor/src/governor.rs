//! The throughput governor.
//!
//! Two rules, applied after every record:
//! 1. Spacing: consecutive records start at least `min_spacing` apart. Time
//!    already spent on the record counts towards the gap.
//! 2. Batch window: after every `batch_calls` records, at least
//!    `batch_window` must have passed since the batch began. The shortfall
//!    is slept, then the batch counter and start marker reset.
//!
//! This is a best-effort client-side throttle, not a token bucket: it
//! absorbs no bursts, trusts the local clock, and knows nothing about other
//! consumers of the same provider quota.

use crate::clock::Clock;
use crate::config::GovernorConfig;
use crate::error::GovernorError;
use kyc_utils::format_duration;
use std::time::Duration;

/// Pauses applied after one record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pause {
    /// Sleep enforcing the minimum spacing.
    pub spacing: Duration,
    /// Sleep enforcing the batch window, zero unless this record closed a batch.
    pub batch: Duration,
}

impl Pause {
    pub fn total(&self) -> Duration {
        self.spacing + self.batch
    }
}

/// Pacing state: one counter and two timestamps.
#[derive(Debug)]
pub struct ThroughputGovernor {
    min_spacing: Duration,
    batch_calls: u32,
    batch_window: Duration,
    /// Records completed in the current batch.
    calls_in_batch: u32,
    /// When the current batch began.
    batch_started: Duration,
    /// When the in-flight record began, if one is in flight.
    call_started: Option<Duration>,
}

impl ThroughputGovernor {
    /// Create a governor whose first batch starts at `now`.
    pub fn new(config: &GovernorConfig, now: Duration) -> Result<Self, GovernorError> {
        config.validate()?;
        Ok(Self {
            min_spacing: config.min_spacing(),
            batch_calls: config.batch_calls,
            batch_window: config.batch_window(),
            calls_in_batch: 0,
            batch_started: now,
            call_started: None,
        })
    }

    /// Mark the start of a record's provider calls.
    pub fn begin_call(&mut self, now: Duration) {
        self.call_started = Some(now);
    }

    pub fn calls_in_batch(&self) -> u32 {
        self.calls_in_batch
    }

    pub fn batch_started(&self) -> Duration {
        self.batch_started
    }

    /// Sleep still owed for spacing: `max(0, min_spacing - elapsed)`.
    ///
    /// With no call in flight, the full spacing is owed.
    pub fn spacing_delay(&self, now: Duration) -> Duration {
        let elapsed = self
            .call_started
            .map(|started| now.saturating_sub(started))
            .unwrap_or(Duration::ZERO);
        self.min_spacing.saturating_sub(elapsed)
    }

    /// Sleep owed for the batch window if one more record completes at `now`.
    pub fn batch_shortfall(&self, now: Duration) -> Duration {
        if self.calls_in_batch + 1 < self.batch_calls {
            return Duration::ZERO;
        }
        let elapsed = now.saturating_sub(self.batch_started);
        self.batch_window.saturating_sub(elapsed)
    }

    fn complete_call(&mut self) -> bool {
        self.call_started = None;
        self.calls_in_batch += 1;
        self.calls_in_batch >= self.batch_calls
    }

    fn reset_batch(&mut self, now: Duration) {
        self.calls_in_batch = 0;
        self.batch_started = now;
    }

    /// Apply both rules after a record finished, sleeping on `clock`.
    pub async fn pace<C: Clock>(&mut self, clock: &C) -> Pause {
        let spacing = self.spacing_delay(clock.now());
        if !spacing.is_zero() {
            tracing::debug!("spacing pause {}", format_duration(spacing));
            clock.sleep(spacing).await;
        }

        let batch = self.batch_shortfall(clock.now());
        if self.complete_call() {
            if !batch.is_zero() {
                tracing::info!(
                    batch_calls = self.batch_calls,
                    "batch ceiling reached, sleeping {}",
                    format_duration(batch)
                );
                clock.sleep(batch).await;
            }
            self.reset_batch(clock.now());
        }

        Pause { spacing, batch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(secs: u64) -> Duration {
        Duration::from_secs(secs)
    }

    fn config(spacing: u64, calls: u32, window: u64) -> GovernorConfig {
        GovernorConfig {
            min_spacing_secs: spacing,
            batch_calls: calls,
            batch_window_secs: window,
        }
    }

    #[test]
    fn zero_batch_size_rejected() {
        assert!(ThroughputGovernor::new(&config(15, 0, 60), s(0)).is_err());
    }

    #[test]
    fn spacing_accounts_for_call_time() {
        let mut gov = ThroughputGovernor::new(&config(15, 4, 60), s(0)).unwrap();
        gov.begin_call(s(100));
        assert_eq!(gov.spacing_delay(s(100)), s(15));
        assert_eq!(gov.spacing_delay(s(104)), s(11));
        assert_eq!(gov.spacing_delay(s(115)), s(0));
        assert_eq!(gov.spacing_delay(s(140)), s(0));
    }

    #[test]
    fn shortfall_only_on_batch_boundary() {
        let mut gov = ThroughputGovernor::new(&config(0, 2, 60), s(0)).unwrap();
        assert_eq!(gov.batch_shortfall(s(10)), s(0));
        assert!(!gov.complete_call());
        assert_eq!(gov.batch_shortfall(s(10)), s(50));
        assert_eq!(gov.batch_shortfall(s(75)), s(0));
        assert!(gov.complete_call());
        gov.reset_batch(s(75));
        assert_eq!(gov.calls_in_batch(), 0);
        assert_eq!(gov.batch_started(), s(75));
    }

    #[test]
    fn single_call_batches() {
        let gov = ThroughputGovernor::new(&config(0, 1, 30), s(5)).unwrap();
        assert_eq!(gov.batch_shortfall(s(5)), s(30));
        assert_eq!(gov.batch_shortfall(s(20)), s(15));
    }
}
