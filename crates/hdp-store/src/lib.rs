//! hedera-data-publisher store - off-chain snapshot storage and SQL sources
//!
//! Provides:
//! - Storage backends (Local, None, S3 stub) behind the `StorageBackend` trait
//! - Atomic content-addressed writes under `.hedera-data-publisher/snapshots`
//! - Reference-scheme resolution for verification
//! - SQLite adapter for the `SqlSource` collaborator

pub mod errors;
pub mod sql;
pub mod storage;

pub use errors::Result;
pub use sql::SqliteSource;
pub use storage::{
    backend_for, backend_for_ref, LocalStorage, NoneStorage, PersistRequest, S3Storage,
    StorageBackend, StorageKind, StorageRef,
};
