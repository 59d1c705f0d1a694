//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the data model and record sources.
#[derive(Debug, Error)]
pub enum KycError {
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("record source failed: {0}")]
    Source(String),
}
