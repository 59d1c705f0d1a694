//! Audit logging for batch runs.
//!
//! Every record read from the source ends up as exactly one row in the audit
//! log, whatever its outcome. The log is append-only and written record by
//! record, so a partially completed run is always inspectable and the log
//! doubles as the resumption record.

pub mod error;
pub mod log;
pub mod reader;

pub use error::AuditError;
pub use log::{CsvAuditLog, HEADER};
pub use reader::{read_log, summarize_log, AuditLogSummary, AuditRow};

use kyc_types::AuditEntry;

/// Durable destination for audit entries.
pub trait AuditSink {
    /// Append one entry. Returns only once the entry is durable.
    fn append(&mut self, entry: &AuditEntry) -> Result<(), AuditError>;
}

impl<S: AuditSink + ?Sized> AuditSink for &mut S {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        (**self).append(entry)
    }
}
