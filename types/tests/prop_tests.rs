use proptest::prelude::*;

use kyc_types::{ArtifactResult, ErrorCode, Metadata, OutcomeTag, SubmissionOutcome, Timestamp};
use std::collections::BTreeSet;

fn artifact_result() -> impl Strategy<Value = ArtifactResult> {
    prop_oneof![
        Just(ArtifactResult::ok()),
        "[a-z]{1,3}\\.[a-z]{1,3}".prop_map(ArtifactResult::failed),
        Just(ArtifactResult {
            success: false,
            error: None,
        }),
    ]
}

proptest! {
    /// Classification is `Success` exactly when every artifact succeeded.
    #[test]
    fn success_iff_all_ok(results in prop::collection::vec(artifact_result(), 0..8)) {
        let outcome = SubmissionOutcome::classify(&results);
        let all_ok = results.iter().all(|r| r.success);
        prop_assert_eq!(outcome.is_success(), all_ok);
        if !all_ok {
            prop_assert_eq!(outcome.tag(), OutcomeTag::PartialFailure);
        }
    }

    /// Partial failures carry exactly the distinct codes of failing artifacts.
    #[test]
    fn partial_failure_codes_are_distinct_failing_codes(
        results in prop::collection::vec(artifact_result(), 1..8)
    ) {
        let expected: BTreeSet<ErrorCode> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.error.clone().unwrap_or_else(ErrorCode::unknown))
            .collect();

        match SubmissionOutcome::classify(&results) {
            SubmissionOutcome::PartialFailure { codes } => prop_assert_eq!(codes, expected),
            SubmissionOutcome::Success => prop_assert!(expected.is_empty()),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    /// Successful artifacts never contribute codes, even when they carry one.
    #[test]
    fn successful_artifacts_contribute_no_codes(code in "[a-z]{1,6}") {
        let results = vec![
            ArtifactResult { success: true, error: Some(ErrorCode::new(code)) },
            ArtifactResult::ok(),
        ];
        prop_assert!(SubmissionOutcome::classify(&results).is_success());
    }

    /// Metadata accepts any JSON object and rejects any bare string.
    #[test]
    fn metadata_accepts_objects_only(key in "[a-z_]{1,8}", value in "[ -~]{0,16}") {
        let mut map = serde_json::Map::new();
        map.insert(key.clone(), serde_json::Value::String(value.clone()));
        let object = serde_json::Value::Object(map).to_string();
        let parsed = Metadata::parse(&object).unwrap();
        prop_assert_eq!(parsed.get(&key).and_then(|v| v.as_str()), Some(value.as_str()));

        let scalar = serde_json::Value::String(value).to_string();
        prop_assert!(Metadata::parse(&scalar).is_err());
    }

    /// The audit `Time` column parses back to the same instant.
    #[test]
    fn timestamp_column_parses_back(secs in 0u64..u64::MAX) {
        let written = Timestamp::new(secs).to_string();
        prop_assert!(written.bytes().all(|b| b.is_ascii_digit()));
        prop_assert_eq!(written.parse::<Timestamp>().unwrap(), Timestamp::new(secs));
    }
}
