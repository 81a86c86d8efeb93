//! Lifecycle macros for loader and validator operations
//!
//! Every operation (`load_yaml`, `load_registry`, `load_blueprint`,
//! `validate`, ...) logs one `start` event followed by exactly one `end` or
//! `end_error` event. Extra fields go after the fixed ones using ordinary
//! `tracing` field syntax.

/// `start` event of an operation
///
/// ```
/// # use haref_core::log_op_start;
/// log_op_start!("validate");
/// log_op_start!("validate", root_context = "automation");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// `end` event of an operation that succeeded
///
/// ```
/// # use haref_core::log_op_end;
/// log_op_end!("load_registry", duration_ms = 12, entities = 340);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// `end_error` event at ERROR level for an operation that aborted
///
/// The error is converted into `ExError` to record its kind and stable code.
///
/// ```
/// # use haref_core::{log_op_error, errors::HarefError};
/// let err = HarefError::RegistryNotFound {
///     path: "/config/.storage/core.entity_registry".to_string(),
/// };
/// log_op_error!("load_registry", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        );
    }};
}

/// `end_error` event at WARN level for a failure the run recovers from
///
/// A missing blueprint or an unreadable optional registry does not stop
/// validation; the failure is logged and the run carries on.
///
/// ```
/// # use haref_core::{log_op_degraded, errors::HarefError};
/// let err = HarefError::BlueprintNotFound { name: "motion_light.yaml".to_string() };
/// log_op_degraded!("load_blueprint", &err, duration_ms = 3, blueprint = "motion_light.yaml");
/// ```
#[macro_export]
macro_rules! log_op_degraded {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let err: &$crate::errors::HarefError = $err;
        let ex_err: $crate::errors::ExError = err.clone().into();
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*,)?
            "{}",
            err
        );
    }};
}
