//! Nullable audit sink: keeps entries in memory.

use kyc_audit::{AuditError, AuditSink};
use kyc_types::AuditEntry;

/// An in-memory audit sink that can be told to fail.
#[derive(Default)]
pub struct NullAuditSink {
    entries: Vec<AuditEntry>,
    fail_after: Option<usize>,
}

impl NullAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` entries, then fail every append.
    pub fn failing_after(count: usize) -> Self {
        Self {
            entries: Vec::new(),
            fail_after: Some(count),
        }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

impl AuditSink for NullAuditSink {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        if self.fail_after.is_some_and(|limit| self.entries.len() >= limit) {
            return Err(AuditError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no space left on device",
            )));
        }
        self.entries.push(entry.clone());
        Ok(())
    }
}
