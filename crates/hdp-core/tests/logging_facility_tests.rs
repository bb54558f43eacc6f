#![allow(clippy::unwrap_used, clippy::expect_used)]

use hdp_core::errors::{ExError, ExErrorKind, PublisherError};
use hdp_core::hdp_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DATASET_ID, FIELD_DURATION_MS, FIELD_ERR_CODE,
};
use hdp_core::logging_facility::test_capture::init_test_capture;
use hdp_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, dataset_id = "d1");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].fields.get(FIELD_DATASET_ID), Some(&"d1".to_string()));
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::TopicNotFound);
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_TOPIC_NOT_FOUND".to_string())
    );
}

#[test]
fn test_log_op_error_accepts_domain_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = PublisherError::EmptyDataset {
        origin: "x.csv".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 1);

    let events = capture.events_for_op(op_name);
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_EMPTY_DATASET".to_string())
    );
}

#[test]
fn test_component_is_module_path() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_5";

    log_op_start!(op_name);

    let events = capture.events_for_op(op_name);
    assert_eq!(
        events[0].component.as_deref(),
        Some("logging_facility_tests")
    );
}
