//! End-to-end batch runs against nullable infrastructure.

use kyc_audit::{read_log, CsvAuditLog};
use kyc_batch::{BatchError, CsvRecordSource, Orchestrator, RecordState};
use kyc_governor::{Clock, GovernorConfig};
use kyc_nullables::{record, NullAuditSink, NullClock, NullProvider, NullSource, ProviderCall};
use kyc_provider::{build_descriptors, DocumentProfile};
use kyc_types::{ArtifactRef, OutcomeTag, SourceItem, SubmissionOutcome};
use std::time::Duration;

fn fallback() -> ArtifactRef {
    ArtifactRef::from("defaults/generic_back.jpg")
}

fn orchestrator(
    provider: NullProvider,
    audit: NullAuditSink,
) -> Orchestrator<NullProvider, NullAuditSink, NullClock> {
    Orchestrator::new(
        provider,
        audit,
        NullClock::new(),
        &GovernorConfig::default(),
        fallback(),
    )
    .unwrap()
}

#[tokio::test]
async fn five_records_follow_the_pacing_formula() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let mut source = NullSource::records(5);

    let summary = orch.run(&mut source, 0, None).await.unwrap();

    // 15 x 3 spacing, remainder to the 60s window, then the 5th record's spacing.
    let expected = Duration::from_secs(15 * 3 + (60 - 45) + 15);
    assert_eq!(orch.clock().total_slept(), expected);
    assert_eq!(summary.paused, expected);
    assert_eq!(summary.processed, 5);
    assert_eq!(summary.succeeded(), 5);
    assert_eq!(summary.next_offset, 5);
    assert_eq!(orch.audit().entries().len(), 5);
}

#[tokio::test]
async fn session_failure_on_third_record_is_isolated() {
    let mut orch = orchestrator(NullProvider::new().fail_session_on(3), NullAuditSink::new());
    let mut source = NullSource::records(5);

    orch.run(&mut source, 0, None).await.unwrap();

    let entries = orch.audit().entries();
    assert_eq!(entries.len(), 5);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.row, i as u64);
        if i == 2 {
            assert_eq!(entry.outcome.tag(), OutcomeTag::SessionOpenFailed);
            assert_eq!(entry.session_column(), "");
        } else {
            assert_eq!(entry.outcome, SubmissionOutcome::Success);
            assert!(!entry.session_column().is_empty());
        }
    }
    // No artifacts were submitted for the failed record.
    assert_eq!(orch.provider().submitted_artifacts().len(), 4);
}

#[tokio::test]
async fn every_call_failing_still_logs_every_record() {
    let mut orch = orchestrator(NullProvider::new().fail_everything(), NullAuditSink::new());
    let mut source = NullSource::records(7);

    let summary = orch.run(&mut source, 0, None).await.unwrap();

    assert_eq!(orch.audit().entries().len(), 7);
    assert_eq!(summary.count(OutcomeTag::AuthFailed), 7);
    assert!(orch
        .audit()
        .entries()
        .iter()
        .all(|e| e.session_id.is_none()));
    // Failures are paced like successes.
    assert!(orch.clock().total_slept() >= Duration::from_secs(15 * 7));
}

#[tokio::test]
async fn auth_failure_skips_remaining_calls() {
    let mut orch = orchestrator(NullProvider::new().fail_auth_on(1), NullAuditSink::new());

    let report = orch.process_record(&record(0, true)).await.unwrap();

    assert_eq!(report.state, RecordState::AuthFailed);
    assert!(matches!(
        &report.entry.outcome,
        SubmissionOutcome::AuthFailed { message } if message.contains("401")
    ));
    assert_eq!(orch.provider().calls(), vec![ProviderCall::AcquireCredential]);
}

#[tokio::test]
async fn rejected_and_garbled_submissions_are_classified() {
    let provider = NullProvider::new()
        .reject_artifacts_on(1, &["documentPhoto.badText", "documentPhoto.badText"])
        .garble_submission_on(2);
    let mut orch = orchestrator(provider, NullAuditSink::new());

    let partial = orch.process_record(&record(0, true)).await.unwrap();
    let garbled = orch.process_record(&record(1, true)).await.unwrap();

    assert_eq!(partial.state, RecordState::Logged);
    assert_eq!(partial.entry.outcome.status_label(), "Errors: documentPhoto.badText");
    assert_eq!(garbled.entry.outcome.tag(), OutcomeTag::TransportError);
    assert_eq!(garbled.entry.session_column(), "session-2");
}

#[tokio::test]
async fn missing_back_submits_fallback_filename() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());

    orch.process_record(&record(0, false)).await.unwrap();

    let submitted = orch.provider().submitted_artifacts();
    assert_eq!(submitted[0].back, fallback());

    let descriptors = build_descriptors(&DocumentProfile::default(), &submitted[0]);
    assert_eq!(descriptors[1].filename(), "generic_back.jpg");
}

#[tokio::test]
async fn metadata_is_passed_through_verbatim() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let input = record(9, true);

    orch.process_record(&input).await.unwrap();

    assert!(matches!(
        &orch.provider().calls()[1],
        ProviderCall::OpenSession { metadata } if *metadata == input.metadata
    ));
    assert_eq!(orch.audit().entries()[0].metadata, input.metadata);
}

#[tokio::test]
async fn rejected_rows_are_logged_without_provider_calls() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let mut source = NullSource::new(vec![
        SourceItem::Rejected {
            row: 0,
            reason: "invalid metadata".into(),
        },
        SourceItem::Record(record(1, true)),
    ]);

    let summary = orch.run(&mut source, 0, None).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.count(OutcomeTag::RecordRejected), 1);
    assert_eq!(orch.audit().entries()[0].outcome.tag(), OutcomeTag::RecordRejected);
    assert_eq!(orch.provider().submitted_artifacts().len(), 1);
    assert_eq!(orch.clock().sleeps(), vec![Duration::from_secs(15)]);
}

#[tokio::test]
async fn audit_failure_aborts_the_batch() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::failing_after(2));
    let mut source = NullSource::records(5);

    let result = orch.run(&mut source, 0, None).await;

    assert!(matches!(result, Err(BatchError::Audit(_))));
    assert_eq!(orch.audit().entries().len(), 2);
    assert_eq!(source.remaining(), 2);
}

#[tokio::test]
async fn source_failure_aborts_the_batch() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let mut source = NullSource::records(5).breaking_after(3);

    let result = orch.run(&mut source, 0, None).await;

    assert!(matches!(result, Err(BatchError::Source(_))));
    assert_eq!(orch.audit().entries().len(), 3);
}

#[tokio::test]
async fn limit_stops_early_and_reports_resume_offset() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let mut source = NullSource::records(5);

    let summary = orch.run(&mut source, 0, Some(2)).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.next_offset, 2);
    assert_eq!(source.remaining(), 3);
}

#[tokio::test]
async fn empty_source_keeps_start_offset() {
    let mut orch = orchestrator(NullProvider::new(), NullAuditSink::new());
    let mut source = NullSource::new(Vec::new());

    let summary = orch.run(&mut source, 42, None).await.unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.next_offset, 42);
    assert_eq!(orch.clock().now(), Duration::ZERO);
}

#[tokio::test]
async fn restarts_append_to_one_csv_log() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    let log = dir.path().join("log.csv");

    let mut sheet = String::from("MetaData,Front Photo,Back Photo,Selfie Photo\n");
    for row in 0..5 {
        sheet.push_str(&format!(
            "\"{{\"\"row\"\": {row}}}\",p/{row}_front.jpg,,p/{row}_selfie.jpg\n"
        ));
    }
    std::fs::write(&input, sheet).unwrap();

    // First run stops after two records, as if interrupted.
    let mut first = Orchestrator::new(
        NullProvider::new(),
        CsvAuditLog::new(&log),
        NullClock::new(),
        &GovernorConfig::default(),
        fallback(),
    )
    .unwrap();
    let mut source = CsvRecordSource::open(&input, 0).unwrap();
    let summary = first.run(&mut source, 0, Some(2)).await.unwrap();
    assert_eq!(summary.next_offset, 2);

    // Second run resumes from the reported offset.
    let mut second = Orchestrator::new(
        NullProvider::new(),
        CsvAuditLog::new(&log),
        NullClock::new(),
        &GovernorConfig::default(),
        fallback(),
    )
    .unwrap();
    let mut source = CsvRecordSource::open(&input, summary.next_offset).unwrap();
    let summary = second.run(&mut source, 2, None).await.unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.next_offset, 5);

    let rows = read_log(&log).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.status == "Success"));
    assert_eq!(rows[4].metadata, r#"{"row":4}"#);

    let text = std::fs::read_to_string(&log).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert_eq!(text.lines().filter(|l| l.starts_with("Verification ID")).count(), 1);
}
