//! Per-run tallies.

use kyc_types::OutcomeTag;
use kyc_utils::format_duration;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// What one call to [`crate::Orchestrator::run`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items consumed from the source, rejected rows included.
    pub processed: u64,
    pub by_tag: BTreeMap<OutcomeTag, u64>,
    /// Time spent sleeping in the governor.
    pub paused: Duration,
    /// Source offset to pass on the next run to continue after this one.
    pub next_offset: u64,
}

impl BatchSummary {
    pub fn starting_at(offset: u64) -> Self {
        Self {
            next_offset: offset,
            ..Self::default()
        }
    }

    pub fn record(&mut self, row: u64, tag: OutcomeTag) {
        self.processed += 1;
        *self.by_tag.entry(tag).or_insert(0) += 1;
        self.next_offset = row + 1;
    }

    pub fn count(&self, tag: OutcomeTag) -> u64 {
        self.by_tag.get(&tag).copied().unwrap_or(0)
    }

    pub fn succeeded(&self) -> u64 {
        self.count(OutcomeTag::Success)
    }

    pub fn failed(&self) -> u64 {
        self.processed - self.succeeded()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "processed {} records ({} succeeded, {} failed), paused {}",
            self.processed,
            self.succeeded(),
            self.failed(),
            format_duration(self.paused)
        )?;
        for (tag, count) in &self.by_tag {
            writeln!(f, "  {:<20} {count}", tag.as_str())?;
        }
        write!(f, "next offset: {}", self.next_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_and_tracks_offset() {
        let mut summary = BatchSummary::starting_at(10);
        assert_eq!(summary.next_offset, 10);

        summary.record(10, OutcomeTag::Success);
        summary.record(11, OutcomeTag::SessionOpenFailed);
        summary.record(12, OutcomeTag::Success);

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.count(OutcomeTag::TransportError), 0);
        assert_eq!(summary.next_offset, 13);
    }

    #[test]
    fn display_lists_tags() {
        let mut summary = BatchSummary::starting_at(0);
        summary.record(0, OutcomeTag::PartialFailure);
        let text = summary.to_string();
        assert!(text.contains("processed 1 records (0 succeeded, 1 failed)"));
        assert!(text.contains("partial_failure"));
        assert!(text.ends_with("next offset: 1"));
    }
}
