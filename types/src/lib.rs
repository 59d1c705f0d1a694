//! Fundamental types for the KYC batch submission pipeline.
//!
//! This crate defines the data model shared across every other crate in the
//! workspace: input records and their artifacts, credentials and sessions,
//! submission outcomes, audit entries, and the record source seam.

pub mod credential;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod outcome;
pub mod record;
pub mod source;
pub mod time;

pub use credential::{AccessCredential, SessionId, VerificationSession};
pub use entry::AuditEntry;
pub use error::KycError;
pub use metadata::Metadata;
pub use outcome::{ArtifactResult, ErrorCode, OutcomeTag, SubmissionOutcome, UNKNOWN_ERROR_CODE};
pub use record::{ArtifactRef, ArtifactSet, VerificationRecord};
pub use source::{RecordSource, SourceItem};
pub use time::Timestamp;
