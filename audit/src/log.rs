//! CSV-backed audit log.
//!
//! The file is opened in append mode for every entry and closed again, so a
//! crash after record K leaves entries for all records up to K on disk. The
//! header is written only when the file is new or empty, which keeps the
//! layout at one header row plus one row per append across restarts. A row
//! torn by a crash mid-write is closed off before the next one is appended.

use crate::error::AuditError;
use crate::AuditSink;
use kyc_types::AuditEntry;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Column names, in order.
pub const HEADER: [&str; 4] = ["Verification ID", "Status", "Metadata", "Time"];

/// Append-only CSV audit log at a fixed path.
#[derive(Clone, Debug)]
pub struct CsvAuditLog {
    path: PathBuf,
}

impl CsvAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Prepare an open log for the next row.
///
/// Returns whether the header still has to be written. A last line left
/// without its terminator by an interrupted write is closed first, so the
/// next row starts on a line of its own.
fn prepare(file: &mut File) -> Result<bool, AuditError> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
    }
    Ok(false)
}

impl AuditSink for CsvAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = prepare(&mut file)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        let status = entry.outcome.status_label();
        let metadata = entry.metadata.to_string();
        let time = entry.completed_at.to_string();
        writer.write_record([
            entry.session_column(),
            status.as_str(),
            metadata.as_str(),
            time.as_str(),
        ])?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| AuditError::Io(e.into_error()))?;
        file.sync_data()?;

        tracing::trace!(path = %self.path.display(), row = entry.row, "audit entry appended");
        Ok(())
    }
}
