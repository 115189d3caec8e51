//! Canonical logging macros
//!
//! Every public store operation emits exactly one `start` event and one
//! `end` or `end_error` event, all carrying `component` and `op`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use simrec_core::log_op_start;
/// log_op_start!("save_record");
/// log_op_start!("save_record", label = "run1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = simrec_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = simrec_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use simrec_core::log_op_end;
/// log_op_end!("save_record", duration_ms = 42);
/// log_op_end!("delete_group", duration_ms = 3, record_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = simrec_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = simrec_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError` and records its kind, code
/// and message. Lookup misses (`NotFound`) are logged at `warn`; everything
/// else at `error`.
///
/// # Example
///
/// ```
/// # use simrec_core::{log_op_error, errors::RecordError};
/// let err = RecordError::RecordNotFound { label: "run1".to_string() };
/// log_op_error!("get_record", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.kind() == $crate::errors::ExErrorKind::NotFound {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = simrec_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                err_message = ex_err.message(),
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = simrec_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                err_message = ex_err.message(),
                $($field)*
            );
        }
    }};
}
