//! Per-record submission outcomes and their classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Code used when a failing artifact result carries no error code.
pub const UNKNOWN_ERROR_CODE: &str = "Unknown error";

/// A provider-side validation error code, e.g. `document.unreadable`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_ERROR_CODE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result for one submitted artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactResult {
    pub success: bool,
    /// Present only for failed artifacts, and not always then.
    pub error: Option<ErrorCode>,
}

impl ArtifactResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(ErrorCode::new(code)),
        }
    }
}

/// Tag identifying the kind of outcome, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeTag {
    AuthFailed,
    SessionOpenFailed,
    Success,
    PartialFailure,
    TransportError,
    RecordRejected,
}

impl OutcomeTag {
    pub const ALL: [OutcomeTag; 6] = [
        OutcomeTag::AuthFailed,
        OutcomeTag::SessionOpenFailed,
        OutcomeTag::Success,
        OutcomeTag::PartialFailure,
        OutcomeTag::TransportError,
        OutcomeTag::RecordRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeTag::AuthFailed => "auth_failed",
            OutcomeTag::SessionOpenFailed => "session_open_failed",
            OutcomeTag::Success => "success",
            OutcomeTag::PartialFailure => "partial_failure",
            OutcomeTag::TransportError => "transport_error",
            OutcomeTag::RecordRejected => "record_rejected",
        }
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one record. Exactly one per record read from the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The access credential could not be obtained.
    AuthFailed { message: String },
    /// The provider did not return a session identifier.
    SessionOpenFailed { message: String },
    /// Every artifact was accepted.
    Success,
    /// At least one artifact was rejected; carries the distinct error codes.
    PartialFailure { codes: BTreeSet<ErrorCode> },
    /// The submission response could not be understood, or the request
    /// never completed.
    TransportError { message: String },
    /// The source row could not be turned into a record.
    RecordRejected { reason: String },
}

impl SubmissionOutcome {
    /// Classify the per-artifact results of a submission.
    ///
    /// `Success` only when every artifact reports success. Otherwise the
    /// distinct codes of the failing artifacts are collected; a failing
    /// artifact without a code contributes [`UNKNOWN_ERROR_CODE`].
    pub fn classify(results: &[ArtifactResult]) -> Self {
        let codes: BTreeSet<ErrorCode> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.error.clone().unwrap_or_else(ErrorCode::unknown))
            .collect();

        if codes.is_empty() {
            SubmissionOutcome::Success
        } else {
            SubmissionOutcome::PartialFailure { codes }
        }
    }

    pub fn tag(&self) -> OutcomeTag {
        match self {
            SubmissionOutcome::AuthFailed { .. } => OutcomeTag::AuthFailed,
            SubmissionOutcome::SessionOpenFailed { .. } => OutcomeTag::SessionOpenFailed,
            SubmissionOutcome::Success => OutcomeTag::Success,
            SubmissionOutcome::PartialFailure { .. } => OutcomeTag::PartialFailure,
            SubmissionOutcome::TransportError { .. } => OutcomeTag::TransportError,
            SubmissionOutcome::RecordRejected { .. } => OutcomeTag::RecordRejected,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success)
    }

    /// Human-readable label written to the `Status` column of the audit log.
    pub fn status_label(&self) -> String {
        match self {
            SubmissionOutcome::AuthFailed { message } => {
                format!("Failed to Authenticate: {message}")
            }
            SubmissionOutcome::SessionOpenFailed { .. } => {
                "Failed to Start Verification".to_string()
            }
            SubmissionOutcome::Success => "Success".to_string(),
            SubmissionOutcome::PartialFailure { codes } => {
                let joined: Vec<&str> = codes.iter().map(ErrorCode::as_str).collect();
                format!("Errors: {}", joined.join(", "))
            }
            SubmissionOutcome::TransportError { message } => {
                format!("Failed to parse response: {message}")
            }
            SubmissionOutcome::RecordRejected { reason } => {
                format!("Rejected Record: {reason}")
            }
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_label())
    }
}
