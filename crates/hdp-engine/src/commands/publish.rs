//! Publish orchestration
//!
//! ## Pipeline (in order)
//! 1. Build the snapshot (source read only; failures abort with no writes)
//! 2. Resolve the dataset id and pick a version strictly after the latest one
//! 3. Persist through the configured storage backend
//! 4. Compose the provenance message
//! 5. Submit to the ledger topic
//!
//! A storage or builder failure aborts before anything reaches the ledger.
//! If submission fails after persist, the stored copy stays behind
//! unreferenced; no partial provenance record can exist.

use crate::services::Services;
use hdp_core::errors::{ExErrorKind, Result};
use hdp_core::ids::{DatasetId, TopicId, Version};
use hdp_core::message::{compose, ComposeInput, ProvenanceMessage};
use hdp_core::snapshot::{build_from_csv, build_from_sql, Snapshot, SqlSource};
use hdp_core::{log_op_end, log_op_error, log_op_start};
use hdp_core_types::RequestId;
use hdp_ledger::{latest_record, Anchor, OperatorIdentity};
use hdp_store::PersistRequest;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Everything a publish needs besides the source
pub struct PublishContext<'a> {
    pub services: &'a Services,
    pub operator: &'a OperatorIdentity,
    pub topic_id: TopicId,
}

/// Outcome of an accepted publish
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub dataset_id: DatasetId,
    pub version: Version,
    pub topic_id: TopicId,
    pub storage_ref: String,
    pub hash: String,
    pub anchor: Anchor,
    pub message: ProvenanceMessage,
}

/// Publish a CSV file
///
/// # Errors
///
/// `InvalidInput`/`EmptyDataset` from the builder, then see [`publish_snapshot`].
pub fn publish_csv(
    ctx: &PublishContext<'_>,
    path: &Path,
    dataset_id: Option<DatasetId>,
) -> Result<PublishResult> {
    let snapshot = build_from_csv(path)?;
    publish_snapshot(ctx, &snapshot, dataset_id)
}

/// Publish the result of a SQL query
///
/// # Errors
///
/// `Connection`/`Query`/`EmptyDataset` from the source, then see
/// [`publish_snapshot`].
pub fn publish_sql(
    ctx: &PublishContext<'_>,
    source: &mut dyn SqlSource,
    query: &str,
    dataset_id: Option<DatasetId>,
) -> Result<PublishResult> {
    let snapshot = build_from_sql(source, query)?;
    publish_snapshot(ctx, &snapshot, dataset_id)
}

/// Persist, compose and submit an already-built snapshot
///
/// With `dataset_id` set, this publishes a new version of that dataset;
/// otherwise a fresh id is minted.
///
/// # Errors
///
/// Storage errors (`Io`, `AlreadyExists`, `NotImplemented`,
/// `InvalidInput`), history errors while looking up the latest version,
/// and ledger errors (`Auth`, `Network`, `TopicNotFound`, `NotImplemented`).
pub fn publish_snapshot(
    ctx: &PublishContext<'_>,
    snapshot: &Snapshot,
    dataset_id: Option<DatasetId>,
) -> Result<PublishResult> {
    let start = Instant::now();
    let request_id = RequestId::new();
    log_op_start!(
        "publish",
        request_id = %request_id,
        topic_id = %ctx.topic_id,
        rows = snapshot.rows(),
        columns = snapshot.columns()
    );

    match run(ctx, snapshot, dataset_id) {
        Ok(result) => {
            log_op_end!(
                "publish",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                dataset_id = %result.dataset_id,
                version = %result.version,
                sequence_number = result.anchor.sequence_number
            );
            Ok(result)
        }
        Err(e) => {
            log_op_error!(
                "publish",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            Err(e)
        }
    }
}

fn run(
    ctx: &PublishContext<'_>,
    snapshot: &Snapshot,
    dataset_id: Option<DatasetId>,
) -> Result<PublishResult> {
    let services = ctx.services;
    let (dataset_id, latest) = match dataset_id {
        Some(id) => (id, latest_version(ctx, id)?),
        None => (DatasetId::new(), None),
    };
    let version = Version::next_after(services.clock.now(), latest.as_ref());

    let storage = services.storage();
    let storage_ref = storage.persist(&PersistRequest {
        snapshot,
        dataset_id,
        version: &version,
    })?;

    let message = compose(
        snapshot,
        &ComposeInput {
            dataset_id,
            version: &version,
            storage_ref: storage_ref.as_str(),
            publisher: ctx.operator.operator_id,
        },
        services.clock.as_ref(),
    );
    let payload = message.to_canonical_bytes()?;
    let anchor = services
        .ledger
        .publisher()
        .publish(&ctx.topic_id, &payload, ctx.operator)?;

    Ok(PublishResult {
        dataset_id,
        version,
        topic_id: ctx.topic_id,
        storage_ref: storage_ref.to_string(),
        hash: message.hash.value.clone(),
        anchor,
        message,
    })
}

/// Latest published version of a dataset; an unknown topic has none yet
fn latest_version(ctx: &PublishContext<'_>, dataset_id: DatasetId) -> Result<Option<Version>> {
    match latest_record(
        ctx.services.ledger.history(),
        ctx.topic_id,
        dataset_id,
        ctx.services.page_size,
    ) {
        Ok(record) => Ok(record.map(|r| r.message.version)),
        Err(e) if e.kind() == ExErrorKind::TopicNotFound => Ok(None),
        Err(e) => Err(e),
    }
}
