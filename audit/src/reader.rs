//! Reading an existing audit log back for inspection.

use crate::error::AuditError;
use crate::log::HEADER;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One data row of the audit log, as text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuditRow {
    #[serde(rename = "Verification ID")]
    pub verification_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Metadata")]
    pub metadata: String,
    #[serde(rename = "Time", default)]
    pub time: String,
}

impl AuditRow {
    /// Status category: the label up to the first `:`.
    pub fn category(&self) -> &str {
        self.status
            .split_once(':')
            .map(|(head, _)| head)
            .unwrap_or(&self.status)
            .trim()
    }
}

/// Read every data row, checking the header matches the expected layout.
pub fn read_log(path: &Path) -> Result<Vec<AuditRow>, AuditError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(AuditError::Malformed(format!(
            "unexpected header {:?} in {}",
            headers.iter().collect::<Vec<_>>(),
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for row in reader.deserialize::<AuditRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Tallies over an audit log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditLogSummary {
    pub rows: usize,
    /// Rows with a non-empty verification id.
    pub sessions_opened: usize,
    /// Row count per status category.
    pub by_category: BTreeMap<String, usize>,
}

impl AuditLogSummary {
    pub fn from_rows(rows: &[AuditRow]) -> Self {
        let mut summary = Self {
            rows: rows.len(),
            ..Default::default()
        };
        for row in rows {
            if !row.verification_id.is_empty() {
                summary.sessions_opened += 1;
            }
            *summary
                .by_category
                .entry(row.category().to_string())
                .or_default() += 1;
        }
        summary
    }

    pub fn count(&self, category: &str) -> usize {
        self.by_category.get(category).copied().unwrap_or(0)
    }
}

/// Read and summarise the log at `path`.
pub fn summarize_log(path: &Path) -> Result<AuditLogSummary, AuditError> {
    let rows = read_log(path)?;
    Ok(AuditLogSummary::from_rows(&rows))
}
