#![allow(clippy::unwrap_used, clippy::expect_used)]

use hdp_core::errors::{ExError, ExErrorKind, PublisherError};

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::EmptyDataset, "ERR_EMPTY_DATASET"),
        (ExErrorKind::Connection, "ERR_CONNECTION"),
        (ExErrorKind::Query, "ERR_QUERY"),
        (ExErrorKind::Auth, "ERR_AUTH"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::HashMismatch, "ERR_HASH_MISMATCH"),
        (ExErrorKind::NotImplemented, "ERR_NOT_IMPLEMENTED"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_verification_outcomes_exit_apart_from_transport() {
    let transport = ExErrorKind::Network.exit_code();

    assert_ne!(ExErrorKind::HashMismatch.exit_code(), transport);
    assert_ne!(ExErrorKind::NotFound.exit_code(), transport);
    assert_ne!(
        ExErrorKind::HashMismatch.exit_code(),
        ExErrorKind::NotFound.exit_code()
    );
    assert_eq!(ExErrorKind::TopicNotFound.exit_code(), transport);
}

#[test]
fn test_every_kind_has_nonzero_exit_code() {
    for kind in [
        ExErrorKind::InvalidInput,
        ExErrorKind::EmptyDataset,
        ExErrorKind::Connection,
        ExErrorKind::Query,
        ExErrorKind::Auth,
        ExErrorKind::Network,
        ExErrorKind::TopicNotFound,
        ExErrorKind::Io,
        ExErrorKind::NotFound,
        ExErrorKind::AlreadyExists,
        ExErrorKind::HashMismatch,
        ExErrorKind::NotImplemented,
        ExErrorKind::Serialization,
        ExErrorKind::Config,
        ExErrorKind::Internal,
    ] {
        assert_ne!(kind.exit_code(), 0, "{kind:?} exits 0");
    }
}

#[test]
fn test_missing_source_is_input_error_with_path() {
    let err: ExError = PublisherError::SourceMissing {
        path: "/data/missing.csv".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.entity_id(), Some("/data/missing.csv"));
    assert_eq!(err.op(), Some("read_source"));
}

#[test]
fn test_invalid_identifier_structured_fields() {
    let err: ExError = "0.0.x".parse::<hdp_core::TopicId>().unwrap_err().into();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("topic id"));
    assert_eq!(err.entity_id(), Some("0.0.x"));
}

#[test]
fn test_serde_error_converts_to_serialization_kind() {
    let bad: Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: ExError = bad.unwrap_err().into();

    assert_eq!(err.kind(), ExErrorKind::Serialization);
}
