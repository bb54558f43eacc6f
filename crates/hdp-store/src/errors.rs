//! Error handling for hdp-store
//!
//! Wraps hdp-core ExError with store-specific helpers

use hdp_core::errors::{ExError, ExErrorKind};
use std::io;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Map a filesystem error, keeping "not found" distinct from other I/O failures
pub fn io_error(operation: &str, target: &str, err: io::Error) -> ExError {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => ExErrorKind::NotFound,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_entity_id(target.to_string())
        .with_message(err.to_string())
}

/// Snapshot referenced by a storage ref does not exist
pub fn storage_missing(reference: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("resolve_storage")
        .with_entity_id(reference.to_string())
        .with_message("referenced snapshot does not exist")
}

/// A different snapshot already occupies the content-addressed path
pub fn storage_collision(path: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("persist_snapshot")
        .with_entity_id(path.to_string())
        .with_message("a different snapshot is already stored for this dataset version")
}

/// Backend that exists only as an extension point
pub fn not_implemented(backend: &str, operation: &str) -> ExError {
    ExError::new(ExErrorKind::NotImplemented)
        .with_op(operation.to_string())
        .with_message(format!("{} storage backend is not implemented", backend))
}

/// Could not open the relational source
pub fn connection_error(target: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op("open_sql_source")
        .with_entity_id(target.to_string())
        .with_message(reason)
}

/// Statement failed to prepare or execute
pub fn query_error(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Query)
        .with_op("run_query")
        .with_message(err.to_string())
}

/// A text cell holds bytes that are not UTF-8
pub fn non_utf8_cell(column: &str, row: usize) -> ExError {
    ExError::new(ExErrorKind::Query)
        .with_op("run_query")
        .with_entity_id(column.to_string())
        .with_message(format!("text value in row {} is not valid UTF-8", row))
}
