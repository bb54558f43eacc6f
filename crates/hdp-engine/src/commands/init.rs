//! Project initialization
//!
//! Writes `.hedera-data-publisher/config.toml`, optionally creating a topic
//! through the configured ledger first so its id lands in the file.

use crate::config::PublisherConfig;
use crate::services::Services;
use hdp_core::errors::Result;
use hdp_core::ids::TopicId;
use hdp_core::{log_op_end, log_op_error, log_op_start};
use hdp_ledger::OperatorIdentity;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const TOPIC_MEMO: &str = "hedera-data-publisher provenance";

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub config: PublisherConfig,
    /// Set when a topic was created during this call
    pub created_topic: Option<TopicId>,
}

/// Create a topic when asked, then persist `config` at `config_path`
///
/// # Errors
///
/// Ledger errors from topic creation (the config is not written then),
/// `Config`/`Io` when saving.
pub fn init(
    services: &Services,
    config: PublisherConfig,
    config_path: &Path,
    create_topic: Option<&OperatorIdentity>,
) -> Result<InitOutcome> {
    let start = Instant::now();
    log_op_start!("init", network = config.network.as_str(), mock = config.mock);

    match run(services, config, config_path, create_topic) {
        Ok(outcome) => {
            log_op_end!("init", duration_ms = start.elapsed().as_millis() as u64);
            Ok(outcome)
        }
        Err(e) => {
            log_op_error!("init", e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            Err(e)
        }
    }
}

fn run(
    services: &Services,
    mut config: PublisherConfig,
    config_path: &Path,
    create_topic: Option<&OperatorIdentity>,
) -> Result<InitOutcome> {
    let created_topic = match create_topic {
        Some(operator) => {
            let topic = services.ledger.publisher().create_topic(TOPIC_MEMO, operator)?;
            config.topic_id = Some(topic);
            Some(topic)
        }
        None => None,
    };
    config.save(config_path)?;
    Ok(InitOutcome {
        config_path: config_path.to_path_buf(),
        config,
        created_topic,
    })
}
