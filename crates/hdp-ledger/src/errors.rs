//! Error helpers for hdp-ledger

use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::ids::TopicId;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

pub fn topic_not_found(topic: &TopicId) -> ExError {
    ExError::new(ExErrorKind::TopicNotFound)
        .with_op("read_topic")
        .with_entity_id(topic.to_string())
        .with_message("topic does not exist on this ledger")
}

/// Ledger or mirror endpoint unreachable, or answered with a transport failure
pub fn network_error(operation: &str, target: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Network)
        .with_op(operation.to_string())
        .with_entity_id(target.to_string())
        .with_message(reason)
}

/// Operator credentials rejected or missing
pub fn auth_error(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Auth)
        .with_op(operation.to_string())
        .with_message(reason)
}

/// Mock journal could not be read or appended
pub fn journal_error(operation: &str, path: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_entity_id(path.to_string())
        .with_message(err.to_string())
}

/// Mock journal line that does not parse
pub fn journal_corrupt(path: &str, line: usize, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("replay_mock_journal")
        .with_entity_id(path.to_string())
        .with_message(format!("line {}: {}", line, reason))
}
