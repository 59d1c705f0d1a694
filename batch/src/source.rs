//! CSV export of the input sheet as a [`RecordSource`].
//!
//! Expected columns: `MetaData`, `Front Photo`, `Back Photo`, `Selfie Photo`.
//! Extra columns are ignored and `Back Photo` may be missing altogether.

use kyc_types::{
    ArtifactRef, KycError, Metadata, RecordSource, SourceItem, VerificationRecord,
};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const METADATA_COLUMN: &str = "MetaData";
pub const FRONT_COLUMN: &str = "Front Photo";
pub const BACK_COLUMN: &str = "Back Photo";
pub const SELFIE_COLUMN: &str = "Selfie Photo";

#[derive(Clone, Copy, Debug)]
struct Columns {
    metadata: usize,
    front: usize,
    back: Option<usize>,
    selfie: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, KycError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| KycError::Source(format!("missing column `{name}`")))
        };
        Ok(Self {
            metadata: require(METADATA_COLUMN)?,
            front: require(FRONT_COLUMN)?,
            back: find(BACK_COLUMN),
            selfie: require(SELFIE_COLUMN)?,
        })
    }
}

/// Reads verification records from CSV, skipping the first `offset` data rows.
pub struct CsvRecordSource<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    columns: Columns,
    /// Zero-based index of the next data row.
    next_row: u64,
    skip_until: u64,
}

impl CsvRecordSource<File> {
    pub fn open(path: &Path, offset: u64) -> Result<Self, KycError> {
        let file = File::open(path)
            .map_err(|e| KycError::Source(format!("{}: {e}", path.display())))?;
        Self::from_reader(file, offset)
    }
}

impl<R: Read> CsvRecordSource<R> {
    pub fn from_reader(reader: R, offset: u64) -> Result<Self, KycError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers().map_err(source_error)?;
        let columns = Columns::locate(headers)?;
        Ok(Self {
            records: reader.into_records(),
            columns,
            next_row: 0,
            skip_until: offset,
        })
    }

    /// Index the next item returned by [`RecordSource::next_record`] will carry.
    pub fn next_row(&self) -> u64 {
        self.next_row.max(self.skip_until)
    }

    fn parse_row(&self, row: u64, fields: &csv::StringRecord) -> SourceItem {
        match self.build_record(row, fields) {
            Ok(record) => SourceItem::Record(record),
            Err(reason) => SourceItem::Rejected { row, reason },
        }
    }

    fn build_record(
        &self,
        row: u64,
        fields: &csv::StringRecord,
    ) -> Result<VerificationRecord, String> {
        let cell = |index: usize| fields.get(index).map(str::trim).unwrap_or("");
        let required = |index: usize, name: &str| {
            let value = cell(index);
            if value.is_empty() {
                Err(format!("empty `{name}`"))
            } else {
                Ok(ArtifactRef::from(value))
            }
        };

        let metadata = Metadata::parse(cell(self.columns.metadata)).map_err(|e| e.to_string())?;
        let front = required(self.columns.front, FRONT_COLUMN)?;
        let back = self
            .columns
            .back
            .map(cell)
            .filter(|value| !value.is_empty())
            .map(ArtifactRef::from);
        let selfie = required(self.columns.selfie, SELFIE_COLUMN)?;

        Ok(VerificationRecord {
            row,
            metadata,
            front,
            back,
            selfie,
        })
    }
}

impl<R: Read> RecordSource for CsvRecordSource<R> {
    fn next_record(&mut self) -> Result<Option<SourceItem>, KycError> {
        loop {
            let Some(result) = self.records.next() else {
                return Ok(None);
            };
            let row = self.next_row;
            self.next_row += 1;

            let fields = match result {
                Ok(fields) => fields,
                Err(e) if e.is_io_error() => return Err(source_error(e)),
                Err(e) if row < self.skip_until => {
                    tracing::trace!(row, "skipping unreadable row before offset: {e}");
                    continue;
                }
                Err(e) => {
                    return Ok(Some(SourceItem::Rejected {
                        row,
                        reason: e.to_string(),
                    }))
                }
            };
            if row < self.skip_until {
                continue;
            }
            return Ok(Some(self.parse_row(row, &fields)));
        }
    }
}

fn source_error(e: csv::Error) -> KycError {
    KycError::Source(e.to_string())
}
