//! Verifier
//!
//! ## Algorithm
//! 1. Walk the dataset's history and pick the record for the requested
//!    version (the latest one when no version is given)
//! 2. Resolve its `storageRef` through the backend the reference's scheme implies
//! 3. Recompute the content hash with the builder's canonicalization
//! 4. Compare case-insensitively with the published `hash.value`
//!
//! A missing record or missing snapshot is a `NOT_FOUND` outcome, not an
//! error. Unreachable ledgers, unknown topics and I/O failures abort.
//!
//! Read-only: repeated calls against unchanged inputs give the same result.

use crate::services::Services;
use hdp_core::errors::{ExErrorKind, Result};
use hdp_core::ids::{DatasetId, TopicId, Version};
use hdp_core::snapshot::digest::{canonical_content_hash, hashes_match};
use hdp_core::{log_op_end, log_op_error, log_op_start};
use hdp_core_types::RequestId;
use hdp_ledger::{Anchor, ConsensusTimestamp, HistoryReader, PublishedRecord};
use hdp_store::StorageRef;
use serde::Serialize;
use std::time::Instant;

/// Which published snapshot to check
#[derive(Debug, Clone)]
pub struct VerifyLocator {
    pub dataset_id: DatasetId,
    /// Message version or consensus timestamp; `None` selects the latest
    pub version: Option<Version>,
    pub topic_id: TopicId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyStatus {
    Match,
    Mismatch,
    NotFound,
}

impl VerifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStatus::Match => "MATCH",
            VerifyStatus::Mismatch => "MISMATCH",
            VerifyStatus::NotFound => "NOT_FOUND",
        }
    }

    /// CLI exit code: 0, or the exit code of the matching error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyStatus::Match => 0,
            VerifyStatus::Mismatch => ExErrorKind::HashMismatch.exit_code(),
            VerifyStatus::NotFound => ExErrorKind::NotFound.exit_code(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status: VerifyStatus,
    pub dataset_id: DatasetId,
    /// Version of the record that was checked
    pub version: Option<Version>,
    pub expected_hash: Option<String>,
    pub actual_hash: Option<String>,
    pub storage_ref: Option<String>,
    pub anchor: Option<Anchor>,
    /// Human-readable explanation for non-`MATCH` outcomes
    pub detail: Option<String>,
}

impl VerificationResult {
    fn not_found(locator: &VerifyLocator, detail: String) -> Self {
        Self {
            status: VerifyStatus::NotFound,
            dataset_id: locator.dataset_id,
            version: locator.version.clone(),
            expected_hash: None,
            actual_hash: None,
            storage_ref: None,
            anchor: None,
            detail: Some(detail),
        }
    }
}

/// Check a published snapshot against its ledger record
///
/// # Errors
///
/// `Network`/`TopicNotFound` from the history source; `Io` or
/// `NotImplemented` while resolving the stored snapshot.
pub fn verify(services: &Services, locator: &VerifyLocator) -> Result<VerificationResult> {
    let start = Instant::now();
    let request_id = RequestId::new();
    log_op_start!(
        "verify",
        request_id = %request_id,
        dataset_id = %locator.dataset_id,
        topic_id = %locator.topic_id
    );

    match run(services, locator) {
        Ok(result) => {
            log_op_end!(
                "verify",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                status = result.status.as_str()
            );
            Ok(result)
        }
        Err(e) => {
            log_op_error!(
                "verify",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            Err(e)
        }
    }
}

fn run(services: &Services, locator: &VerifyLocator) -> Result<VerificationResult> {
    let Some(record) = locate(services, locator)? else {
        let detail = match &locator.version {
            Some(v) => format!(
                "no published record for dataset {} version {}",
                locator.dataset_id, v
            ),
            None => format!("no published record for dataset {}", locator.dataset_id),
        };
        return Ok(VerificationResult::not_found(locator, detail));
    };

    let reference = StorageRef::new(record.message.storage_ref.clone());
    let backend = services.storage_for(&reference);
    let bytes = match backend.resolve(&reference) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ExErrorKind::NotFound => {
            let mut result = VerificationResult::not_found(
                locator,
                format!("stored snapshot is missing: {}", reference),
            );
            result.version = Some(record.message.version.clone());
            result.expected_hash = Some(record.message.hash.value.clone());
            result.storage_ref = Some(reference.to_string());
            result.anchor = Some(record.anchor);
            return Ok(result);
        }
        Err(e) => return Err(e),
    };

    let expected = record.message.hash.value.clone();
    let actual = canonical_content_hash(&bytes);
    let (status, detail) = if hashes_match(&expected, &actual) {
        (VerifyStatus::Match, None)
    } else {
        (
            VerifyStatus::Mismatch,
            Some("stored snapshot does not hash to the published value".to_string()),
        )
    };

    Ok(VerificationResult {
        status,
        dataset_id: locator.dataset_id,
        version: Some(record.message.version),
        expected_hash: Some(expected),
        actual_hash: Some(actual),
        storage_ref: Some(reference.to_string()),
        anchor: Some(record.anchor),
        detail,
    })
}

/// The record for the requested version, or the latest one
fn locate(services: &Services, locator: &VerifyLocator) -> Result<Option<PublishedRecord>> {
    let reader = HistoryReader::new(
        services.ledger.history(),
        locator.topic_id,
        locator.dataset_id,
    )
    .with_page_size(services.page_size);

    let mut found = None;
    for record in reader {
        let record = record?;
        match &locator.version {
            Some(wanted) if !version_matches(&record, wanted) => {}
            Some(_) => return Ok(Some(record)),
            None => found = Some(record),
        }
    }
    Ok(found)
}

/// A record answers to its message version and to its consensus timestamp
fn version_matches(record: &PublishedRecord, wanted: &Version) -> bool {
    if record.message.version == *wanted {
        return true;
    }
    wanted
        .as_str()
        .parse::<ConsensusTimestamp>()
        .is_ok_and(|ts| ts == record.anchor.consensus_timestamp)
}
