//! Names shared by every structured log event
//!
//! Operation names and field keys are part of the log format consumed by
//! `--log-json` users, so they are spelled once here.

// Lifecycle markers carried in the `event` field
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operations carried in the `op` field
pub const OP_DISCOVER_DOCUMENTS: &str = "discover_documents";
pub const OP_LOAD_YAML: &str = "load_yaml";
pub const OP_LOAD_REGISTRY: &str = "load_registry";
pub const OP_LOAD_BLUEPRINT: &str = "load_blueprint";
pub const OP_RESOLVE_BLUEPRINT: &str = "resolve_blueprint";
pub const OP_VALIDATE: &str = "validate";

// Field keys
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_ROOT_CONTEXT: &str = "root_context";
pub const FIELD_BLUEPRINT: &str = "blueprint";
pub const FIELD_FINDINGS: &str = "findings";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_KIND: &str = "err.kind";
