//! Core types shared across hedera-data-publisher facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation**: `RequestId` tagging one CLI or library operation
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction
//! - **Schema constants**: Canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
