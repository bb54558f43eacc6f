//! History listing

use crate::services::Services;
use hdp_core::errors::Result;
use hdp_core::ids::{DatasetId, TopicId};
use hdp_core::{log_op_end, log_op_error, log_op_start};
use hdp_core_types::RequestId;
use hdp_ledger::{read_history, PublishedRecord};
use std::time::Instant;

/// Every published record of a dataset, ascending by ledger order
///
/// An empty list is not an error.
///
/// # Errors
///
/// `Network` or `TopicNotFound` from the history source.
pub fn history(
    services: &Services,
    topic_id: TopicId,
    dataset_id: DatasetId,
) -> Result<Vec<PublishedRecord>> {
    let start = Instant::now();
    let request_id = RequestId::new();
    log_op_start!(
        "history",
        request_id = %request_id,
        dataset_id = %dataset_id,
        topic_id = %topic_id
    );

    match read_history(services.ledger.history(), topic_id, dataset_id, services.page_size) {
        Ok(records) => {
            log_op_end!(
                "history",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                records = records.len()
            );
            Ok(records)
        }
        Err(e) => {
            log_op_error!(
                "history",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            Err(e)
        }
    }
}
