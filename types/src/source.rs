//! The record source seam.
//!
//! A source yields verification requests strictly in order. How the rows are
//! stored (spreadsheet export, database, fixture) is the source's concern.

use crate::error::KycError;
use crate::record::VerificationRecord;

/// One item read from a source.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceItem {
    /// A well-formed record, ready for submission.
    Record(VerificationRecord),
    /// A row that could not be turned into a record. Still accounted for in
    /// the audit log.
    Rejected { row: u64, reason: String },
}

impl SourceItem {
    pub fn row(&self) -> u64 {
        match self {
            SourceItem::Record(record) => record.row,
            SourceItem::Rejected { row, .. } => *row,
        }
    }
}

/// An ordered, finite sequence of verification requests.
pub trait RecordSource {
    /// Read the next item, or `Ok(None)` once the source is exhausted.
    ///
    /// An `Err` means the source itself failed (e.g. the file became
    /// unreadable) and no further items can be produced.
    fn next_record(&mut self) -> Result<Option<SourceItem>, KycError>;
}
