//! `history`

use super::{base_dir, print_json, resolve_config};
use crate::GlobalArgs;
use clap::Args;
use hdp_core::errors::Result;
use hdp_core::ids::{DatasetId, TopicId};
use hdp_engine::commands::history;
use hdp_engine::{ConfigOverrides, Services};
use hdp_ledger::Network;
use serde_json::json;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub dataset_id: DatasetId,

    #[arg(long)]
    pub topic: Option<TopicId>,

    #[arg(long)]
    pub network: Option<Network>,

    #[arg(long)]
    pub mock: bool,
}

pub fn execute(global: &GlobalArgs, args: HistoryArgs) -> Result<i32> {
    let base = base_dir()?;
    let config = resolve_config(
        global,
        &base,
        ConfigOverrides {
            network: args.network,
            topic_id: args.topic,
            mock: args.mock,
            ..ConfigOverrides::default()
        },
    )?;
    let topic_id = config.require_topic()?;
    let services = Services::from_config(&config, &base)?;

    let records = history(&services, topic_id, args.dataset_id)?;

    if global.json {
        let rendered: Vec<_> = records
            .iter()
            .map(|r| {
                json!({
                    "sequenceNumber": r.anchor.sequence_number,
                    "consensusTimestamp": r.anchor.consensus_timestamp,
                    "message": r.message,
                })
            })
            .collect();
        print_json(&rendered)?;
    } else if records.is_empty() {
        println!("No published versions of {} on topic {}", args.dataset_id, topic_id);
    } else {
        for r in &records {
            println!(
                "{:>6}  {}  {}  {}  {}",
                r.anchor.sequence_number,
                r.anchor.consensus_timestamp,
                r.message.version,
                r.message.hash.value,
                r.message.storage_ref
            );
        }
    }
    Ok(0)
}
