//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent between the logging macros,
//! the test capture layer, and anything that parses JSON log output.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_DATASET_ID: &str = "dataset_id";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_TOPIC_ID: &str = "topic_id";

// Snapshot shape
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_COLUMNS: &str = "columns";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
