//! Audit entries: one per processed record, regardless of outcome.

use crate::credential::SessionId;
use crate::metadata::Metadata;
use crate::outcome::SubmissionOutcome;
use crate::time::Timestamp;

/// The durable record of one processed input record.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditEntry {
    /// Zero-based source row the entry belongs to.
    pub row: u64,
    /// Empty when no session was opened.
    pub session_id: Option<SessionId>,
    pub outcome: SubmissionOutcome,
    pub metadata: Metadata,
    pub completed_at: Timestamp,
}

impl AuditEntry {
    pub fn new(
        row: u64,
        session_id: Option<SessionId>,
        outcome: SubmissionOutcome,
        metadata: Metadata,
        completed_at: Timestamp,
    ) -> Self {
        Self {
            row,
            session_id,
            outcome,
            metadata,
            completed_at,
        }
    }

    /// Session identifier as written to the log (empty string when absent).
    pub fn session_column(&self) -> &str {
        self.session_id.as_ref().map(SessionId::as_str).unwrap_or("")
    }
}
