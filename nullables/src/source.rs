//! Nullable record source: records from memory.

use kyc_types::{ArtifactRef, KycError, Metadata, RecordSource, SourceItem, VerificationRecord};
use std::collections::VecDeque;

/// A record source backed by a queue of items.
pub struct NullSource {
    items: VecDeque<SourceItem>,
    /// Fail with a source error once this many items have been read.
    break_after: Option<usize>,
    read: usize,
}

impl NullSource {
    pub fn new(items: Vec<SourceItem>) -> Self {
        Self {
            items: items.into(),
            break_after: None,
            read: 0,
        }
    }

    /// `count` well-formed records on rows `0..count`, each with a back photo.
    pub fn records(count: u64) -> Self {
        Self::new((0..count).map(|row| SourceItem::Record(record(row, true))).collect())
    }

    /// Make the source fail once `count` items have been read.
    pub fn breaking_after(mut self, count: usize) -> Self {
        self.break_after = Some(count);
        self
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

/// A well-formed record for `row`; `with_back` controls the back photo.
pub fn record(row: u64, with_back: bool) -> VerificationRecord {
    let mut map = serde_json::Map::new();
    map.insert("row".into(), serde_json::Value::from(row));
    VerificationRecord {
        row,
        metadata: Metadata::from(map),
        front: ArtifactRef::new(format!("photos/{row}_front.jpg")),
        back: with_back.then(|| ArtifactRef::new(format!("photos/{row}_back.jpg"))),
        selfie: ArtifactRef::new(format!("photos/{row}_selfie.jpg")),
    }
}

impl RecordSource for NullSource {
    fn next_record(&mut self) -> Result<Option<SourceItem>, KycError> {
        if self.break_after.is_some_and(|limit| self.read >= limit) {
            return Err(KycError::Source("input became unreadable".into()));
        }
        let item = self.items.pop_front();
        if item.is_some() {
            self.read += 1;
        }
        Ok(item)
    }
}
