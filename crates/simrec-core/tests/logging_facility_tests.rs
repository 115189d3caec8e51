#![allow(clippy::unwrap_used, clippy::expect_used)]

use simrec_core::errors::{ExError, ExErrorKind, RecordError};
use simrec_core::logging_facility::test_capture::init_test_capture;
use simrec_core::{log_op_end, log_op_error, log_op_start};
use simrec_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ERR_MESSAGE,
};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_not_found_logged_as_warning() {
    let capture = init_test_capture();
    let op_name = "test_not_found_warn_unique_3";

    let err = RecordError::RecordNotFound {
        label: "missing".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(event.level, Level::WARN);
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_persistence_failure_logged_as_error() {
    let capture = init_test_capture();
    let op_name = "test_persistence_error_unique_4";

    let err = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
    log_op_error!(op_name, err, duration_ms = 5, label = "run1");

    let event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have error event");

    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_PERSISTENCE"));
    assert_eq!(event.field(FIELD_ERR_MESSAGE), Some("disk I/O error"));
    assert_eq!(event.field("label"), Some("run1"));
}

#[test]
fn test_single_start_end_per_operation() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_5";

    log_op_start!(op_name, label = "run1");
    log_op_end!(op_name, duration_ms = 42, label = "run1");

    let events = capture.events_for_label(op_name, "run1");
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .count();

    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
}

#[test]
fn test_assert_event_with_field() {
    let capture = init_test_capture();
    let op_name = "test_event_with_field_unique_6";

    log_op_end!(op_name, duration_ms = 1, record_count = 3_u64);

    capture.assert_event_with_field(op_name, EVENT_END, "record_count", "3");
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_count_events() {
    let capture = init_test_capture();
    let op1_name = "test_count_events_op1_unique_7";
    let op2_name = "test_count_events_op2_unique_7";

    log_op_start!(op1_name);
    log_op_start!(op2_name);
    log_op_end!(op1_name, duration_ms = 10);

    let start_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_START)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });
    let end_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_END)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });

    assert_eq!(start_count, 2);
    assert_eq!(end_count, 1);
}
