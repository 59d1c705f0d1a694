//! Batch submission pipeline.
//!
//! Reads verification records from a [`kyc_types::RecordSource`], drives each
//! one through a [`kyc_provider::ProviderClient`], appends the outcome to a
//! [`kyc_audit::AuditSink`] and lets a [`kyc_governor::ThroughputGovernor`]
//! pace the loop. Strictly sequential: one record is submitted, logged and
//! paced before the next is read.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod summary;

pub use config::BatchConfig;
pub use error::BatchError;
pub use orchestrator::{Attempt, Orchestrator, RecordReport, RecordState};
pub use source::CsvRecordSource;
pub use summary::BatchSummary;
