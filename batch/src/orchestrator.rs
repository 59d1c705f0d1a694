//! Submission orchestrator: drives each record through the provider, logs it,
//! then lets the governor pace the loop.
//!
//! Per record:
//!
//! ```text
//! Start ─► CredentialAcquired ─► SessionOpened ─► ArtifactsSubmitted ─► Logged
//!   │               │
//!   ▼               ▼
//! AuthFailed   SessionOpenFailed
//! ```
//!
//! Provider failures never escape a record: they become a
//! [`SubmissionOutcome`] and are logged like any other result. Only a failing
//! audit sink or an unreadable source stops the batch, since continuing would
//! break the one-entry-per-record guarantee.

use crate::error::BatchError;
use crate::summary::BatchSummary;
use kyc_audit::AuditSink;
use kyc_governor::{Clock, GovernorConfig, Pause, ThroughputGovernor};
use kyc_provider::{ProviderClient, ProviderError};
use kyc_types::{
    ArtifactRef, AuditEntry, Metadata, RecordSource, SessionId, SourceItem, SubmissionOutcome,
    Timestamp, VerificationRecord,
};
use kyc_utils::format_duration;

/// Where a record's processing stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordState {
    Start,
    CredentialAcquired,
    SessionOpened,
    ArtifactsSubmitted,
    /// Terminal: the entry is durable.
    Logged,
    /// Terminal: no credential, nothing else was attempted.
    AuthFailed,
    /// Terminal: no session, artifacts were not submitted.
    SessionOpenFailed,
}

impl RecordState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecordState::Logged | RecordState::AuthFailed | RecordState::SessionOpenFailed
        )
    }
}

/// Result of driving a record through the provider, before logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub state: RecordState,
    pub session_id: Option<SessionId>,
    pub outcome: SubmissionOutcome,
}

impl Attempt {
    fn stopped(
        state: RecordState,
        session_id: Option<SessionId>,
        outcome: SubmissionOutcome,
    ) -> Self {
        Self {
            state,
            session_id,
            outcome,
        }
    }
}

/// What happened to one source item.
#[derive(Clone, Debug)]
pub struct RecordReport {
    /// Terminal state reached.
    pub state: RecordState,
    pub entry: AuditEntry,
    pub pause: Pause,
}

/// Sequential batch driver over a provider, an audit sink and a clock.
pub struct Orchestrator<P, A, C> {
    provider: P,
    audit: A,
    clock: C,
    governor: ThroughputGovernor,
    fallback_back: ArtifactRef,
}

impl<P, A, C> Orchestrator<P, A, C>
where
    P: ProviderClient,
    A: AuditSink,
    C: Clock,
{
    pub fn new(
        provider: P,
        audit: A,
        clock: C,
        governor: &GovernorConfig,
        fallback_back: ArtifactRef,
    ) -> Result<Self, BatchError> {
        let governor = ThroughputGovernor::new(governor, clock.now())?;
        Ok(Self {
            provider,
            audit,
            clock,
            governor,
            fallback_back,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn governor(&self) -> &ThroughputGovernor {
        &self.governor
    }

    pub fn into_parts(self) -> (P, A, C) {
        (self.provider, self.audit, self.clock)
    }

    /// Run the three provider calls for `record`. Never fails: every error
    /// is folded into the returned outcome.
    pub async fn attempt(&self, record: &VerificationRecord) -> Attempt {
        let mut state = RecordState::Start;
        tracing::trace!(row = record.row, ?state);

        let credential = match self.provider.acquire_credential().await {
            Ok(credential) => credential,
            Err(e) => {
                return Attempt::stopped(
                    RecordState::AuthFailed,
                    None,
                    SubmissionOutcome::AuthFailed { message: detail(e) },
                );
            }
        };
        state = RecordState::CredentialAcquired;
        tracing::trace!(row = record.row, ?state);

        let session = match self.provider.open_session(&credential, &record.metadata).await {
            Ok(session) => session,
            Err(e) => {
                return Attempt::stopped(
                    RecordState::SessionOpenFailed,
                    None,
                    SubmissionOutcome::SessionOpenFailed { message: detail(e) },
                );
            }
        };
        state = RecordState::SessionOpened;
        tracing::trace!(row = record.row, session = %session.id, ?state);

        let artifacts = record.artifacts(&self.fallback_back);
        let outcome = match self
            .provider
            .submit_artifacts(&credential, &session, &artifacts)
            .await
        {
            Ok(results) => SubmissionOutcome::classify(&results),
            Err(e) => SubmissionOutcome::TransportError { message: detail(e) },
        };

        Attempt::stopped(RecordState::ArtifactsSubmitted, Some(session.id), outcome)
    }

    /// Submit, log and pace one record.
    pub async fn process_record(
        &mut self,
        record: &VerificationRecord,
    ) -> Result<RecordReport, BatchError> {
        self.governor.begin_call(self.clock.now());
        let attempt = self.attempt(record).await;

        let entry = AuditEntry::new(
            record.row,
            attempt.session_id,
            attempt.outcome,
            record.metadata.clone(),
            Timestamp::now(),
        );
        self.audit.append(&entry)?;
        log_entry(&entry);

        let state = match attempt.state {
            RecordState::ArtifactsSubmitted => RecordState::Logged,
            early_exit => early_exit,
        };
        let pause = self.governor.pace(&self.clock).await;
        Ok(RecordReport {
            state,
            entry,
            pause,
        })
    }

    /// Handle one item from the source. Rejected rows are logged but make no
    /// provider calls, so they are not paced.
    pub async fn process_item(&mut self, item: SourceItem) -> Result<RecordReport, BatchError> {
        match item {
            SourceItem::Record(record) => self.process_record(&record).await,
            SourceItem::Rejected { row, reason } => {
                let entry = AuditEntry::new(
                    row,
                    None,
                    SubmissionOutcome::RecordRejected { reason },
                    Metadata::empty(),
                    Timestamp::now(),
                );
                self.audit.append(&entry)?;
                log_entry(&entry);
                Ok(RecordReport {
                    state: RecordState::Logged,
                    entry,
                    pause: Pause::default(),
                })
            }
        }
    }

    /// Process items from `source` in order until it is exhausted or `limit`
    /// items have been handled.
    ///
    /// `start_offset` is the row the source was opened at; it becomes the
    /// summary's `next_offset` when nothing is processed.
    pub async fn run<S: RecordSource>(
        &mut self,
        source: &mut S,
        start_offset: u64,
        limit: Option<u64>,
    ) -> Result<BatchSummary, BatchError> {
        let mut summary = BatchSummary::starting_at(start_offset);
        tracing::info!(start_offset, ?limit, "batch started");

        while limit.map_or(true, |limit| summary.processed < limit) {
            let Some(item) = source.next_record()? else {
                break;
            };
            let report = self.process_item(item).await?;
            summary.record(report.entry.row, report.entry.outcome.tag());
            summary.paused += report.pause.total();
        }

        tracing::info!(
            processed = summary.processed,
            succeeded = summary.succeeded(),
            next_offset = summary.next_offset,
            "batch finished after pausing {}",
            format_duration(summary.paused)
        );
        Ok(summary)
    }
}

fn detail(error: ProviderError) -> String {
    match error {
        ProviderError::Auth(message)
        | ProviderError::SessionOpen(message)
        | ProviderError::Transport(message)
        | ProviderError::Config(message) => message,
        other => other.to_string(),
    }
}

fn log_entry(entry: &AuditEntry) {
    if entry.outcome.is_success() {
        tracing::info!(
            row = entry.row,
            session = entry.session_column(),
            "record verified"
        );
    } else {
        tracing::warn!(
            row = entry.row,
            session = entry.session_column(),
            outcome = %entry.outcome.tag(),
            "{}",
            entry.outcome
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RecordState::Logged.is_terminal());
        assert!(RecordState::AuthFailed.is_terminal());
        assert!(RecordState::SessionOpenFailed.is_terminal());
        assert!(!RecordState::SessionOpened.is_terminal());
        assert!(!RecordState::Start.is_terminal());
    }

    #[test]
    fn detail_strips_variant_prefix() {
        assert_eq!(detail(ProviderError::Auth("HTTP status 401".into())), "HTTP status 401");
        let unavailable = ProviderError::ArtifactUnavailable {
            path: "a.jpg".into(),
            reason: "not found".into(),
        };
        assert_eq!(detail(unavailable), "artifact a.jpg unavailable: not found");
    }
}
