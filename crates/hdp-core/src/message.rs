//! Provenance Message Composer
//!
//! The on-ledger record is a fixed-schema JSON object whose keys always
//! appear in this order:
//!
//! ```text
//! v, event, datasetId, version, source, hash, schemaHash, storageRef,
//! rows, columns, publisher, ts
//! ```
//!
//! Field order comes from struct declaration order under `serde_json`, so
//! the same inputs always serialize to the same bytes.

use crate::clock::Clock;
use crate::errors::{PublisherError, Result};
use crate::ids::{AccountId, DatasetId, Version};
use crate::snapshot::digest::HASH_ALGO;
use crate::snapshot::{Snapshot, SourceType};
use serde::{Deserialize, Serialize};

/// Message schema version; bump on any field-layout change
pub const MESSAGE_SCHEMA_VERSION: u32 = 1;

/// Fixed event literal
pub const EVENT_DATASET_PUBLISHED: &str = "DATASET_PUBLISHED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDescriptor {
    pub algo: String,
    pub value: String,
}

/// On-ledger provenance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceMessage {
    pub v: u32,
    pub event: String,
    pub dataset_id: DatasetId,
    pub version: Version,
    pub source: SourceDescriptor,
    pub hash: HashDescriptor,
    pub schema_hash: String,
    pub storage_ref: String,
    pub rows: u64,
    pub columns: u64,
    pub publisher: AccountId,
    pub ts: i64,
}

/// Per-publish inputs that do not come from the snapshot itself
#[derive(Debug, Clone)]
pub struct ComposeInput<'a> {
    pub dataset_id: DatasetId,
    pub version: &'a Version,
    pub storage_ref: &'a str,
    pub publisher: AccountId,
}

/// Compose the provenance message for a snapshot
///
/// `ts` is the composer's wall-clock time in whole seconds, read from
/// `clock`; it is distinct from the ledger's consensus timestamp.
pub fn compose(snapshot: &Snapshot, input: &ComposeInput<'_>, clock: &dyn Clock) -> ProvenanceMessage {
    ProvenanceMessage {
        v: MESSAGE_SCHEMA_VERSION,
        event: EVENT_DATASET_PUBLISHED.to_string(),
        dataset_id: input.dataset_id,
        version: input.version.clone(),
        source: SourceDescriptor {
            source_type: snapshot.source_type(),
        },
        hash: HashDescriptor {
            algo: HASH_ALGO.to_string(),
            value: snapshot.content_hash().to_string(),
        },
        schema_hash: snapshot.schema_hash().to_string(),
        storage_ref: input.storage_ref.to_string(),
        rows: snapshot.rows(),
        columns: snapshot.columns(),
        publisher: input.publisher,
        ts: clock.now().timestamp(),
    }
}

impl ProvenanceMessage {
    /// Byte-stable JSON encoding submitted to the ledger
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self).map_err(PublisherError::from)?)
    }

    /// Decode a ledger payload
    ///
    /// Accepts any schema version up to [`MESSAGE_SCHEMA_VERSION`]; unknown
    /// extra keys are ignored.
    ///
    /// # Errors
    ///
    /// `Serialization` when the payload is not a `DATASET_PUBLISHED`
    /// message this build can parse.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_slice(payload).map_err(|e| PublisherError::MessageDecode {
                reason: e.to_string(),
            })?;

        let v = raw
            .get("v")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| PublisherError::MessageDecode {
                reason: "missing integer field 'v'".to_string(),
            })?;
        if v > u64::from(MESSAGE_SCHEMA_VERSION) {
            return Err(PublisherError::UnsupportedSchemaVersion {
                v: u32::try_from(v).unwrap_or(u32::MAX),
                supported: MESSAGE_SCHEMA_VERSION,
            }
            .into());
        }
        if raw.get("event").and_then(serde_json::Value::as_str) != Some(EVENT_DATASET_PUBLISHED) {
            return Err(PublisherError::MessageDecode {
                reason: "event is not DATASET_PUBLISHED".to_string(),
            }
            .into());
        }

        serde_json::from_value(raw).map_err(|e| {
            PublisherError::MessageDecode {
                reason: e.to_string(),
            }
            .into()
        })
    }
}
