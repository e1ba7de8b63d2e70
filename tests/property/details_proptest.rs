//! Property-based tests for ApiError construction

use axum::http::StatusCode;
use proptest::prelude::*;
use serde_json::json;
use xfreport::backend::error::ApiError;
use xfreport::backend::reporting::ErrorReporter;
use xfreport::shared::{Details, LoggingMode};

proptest! {
    #[test]
    fn test_code_and_message_survive_construction(
        code in 400u16..600,
        message in "[A-Za-z][A-Za-z ]{0,40}",
    ) {
        let status = StatusCode::from_u16(code).unwrap();
        let reporter = ErrorReporter::disabled();

        let err = ApiError::new(&reporter, status, message.clone(), LoggingMode::Off, None, None);

        prop_assert_eq!(err.http_code(), status);
        prop_assert_eq!(err.message(), message.as_str());
    }

    #[test]
    fn test_from_failure_never_overwrites_message(
        existing in ".*",
        failure_text in "[a-z][a-z ]{0,30}",
        extra_keys in proptest::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let reporter = ErrorReporter::disabled();
        let mut details = Details::new();
        details.insert("message".to_string(), json!(existing.clone()));
        for key in &extra_keys {
            details.entry(key.clone()).or_insert(json!(true));
        }
        let before = details.len();
        let failure = std::io::Error::new(std::io::ErrorKind::Other, failure_text.clone());

        let err = ApiError::from_failure(
            &reporter,
            &failure,
            StatusCode::INTERNAL_SERVER_ERROR,
            LoggingMode::Off,
            Some(details),
        );

        let details = err.internal_details().unwrap();
        prop_assert_eq!(details.get("message"), Some(&json!(existing)));
        prop_assert_eq!(details.len(), before + 1);
        let merged: Vec<_> = details
            .iter()
            .filter(|(key, value)| key.starts_with("message_") && **value == json!(failure_text))
            .collect();
        prop_assert_eq!(merged.len(), 1);
        prop_assert_eq!(err.message(), "An error occurred");
    }
}
