//! hedera-data-publisher engine - pipeline orchestration
//!
//! Wires the snapshot builder, storage backends and ledger collaborators
//! into the four top-level operations: `init`, `publish`, `verify` and
//! `history`. Each operation runs sequentially to completion; the only
//! suspension points are the blocking I/O calls of its collaborators.

pub mod commands;
pub mod config;
pub mod services;

pub use config::{ConfigOverrides, PublisherConfig, StorageConfig};
pub use services::{Ledger, Services};
