//! hedera-data-publisher core
//!
//! Everything needed to turn a tabular source into a verifiable provenance
//! record, with no I/O beyond reading the source:
//! - Structured error facility (`ExError`, `ExErrorKind`)
//! - Logging facility (profiles, operation macros, test capture)
//! - Typed identifiers (`DatasetId`, `TopicId`, `AccountId`, `Version`)
//! - Snapshot Builder with canonicalization and SHA-256 digests
//! - Provenance Message Composer and decoder

pub use hdp_core_types;

pub mod clock;
pub mod errors;
pub mod ids;
pub mod logging_facility;
pub mod message;
pub mod snapshot;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ExError, ExErrorKind, PublisherError, Result};
pub use ids::{AccountId, DatasetId, TopicId, Version};
pub use message::{compose, ComposeInput, ProvenanceMessage};
pub use snapshot::{Snapshot, SourceType};
