//! Pacing limits.

use crate::error::GovernorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate ceiling for provider calls.
///
/// Defaults follow the provider's published limit: 4 record submissions per
/// 60 seconds, at least 15 seconds apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Minimum time between the starts of consecutive records.
    #[serde(default = "default_min_spacing_secs")]
    pub min_spacing_secs: u64,

    /// Number of records per batch window.
    #[serde(default = "default_batch_calls")]
    pub batch_calls: u32,

    /// Minimum length of one batch window.
    #[serde(default = "default_batch_window_secs")]
    pub batch_window_secs: u64,
}

fn default_min_spacing_secs() -> u64 {
    15
}

fn default_batch_calls() -> u32 {
    4
}

fn default_batch_window_secs() -> u64 {
    60
}

impl GovernorConfig {
    pub fn min_spacing(&self) -> Duration {
        Duration::from_secs(self.min_spacing_secs)
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_secs(self.batch_window_secs)
    }

    pub fn validate(&self) -> Result<(), GovernorError> {
        if self.batch_calls == 0 {
            return Err(GovernorError::InvalidConfig(
                "batch_calls must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            min_spacing_secs: default_min_spacing_secs(),
            batch_calls: default_batch_calls(),
            batch_window_secs: default_batch_window_secs(),
        }
    }
}
