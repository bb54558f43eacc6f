//! `init`

use super::{base_dir, config_file, operator_identity, print_json};
use crate::GlobalArgs;
use clap::Args;
use hdp_core::errors::Result;
use hdp_core::ids::{AccountId, TopicId};
use hdp_engine::commands::init;
use hdp_engine::{ConfigOverrides, PublisherConfig, Services};
use hdp_ledger::Network;
use hdp_store::StorageKind;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub network: Option<Network>,

    /// Create a new topic and record it in the config
    #[arg(long)]
    pub create_topic: bool,

    #[arg(long)]
    pub operator_id: Option<AccountId>,

    /// Record an existing topic
    #[arg(long, conflicts_with = "create_topic")]
    pub topic: Option<TopicId>,

    #[arg(long)]
    pub storage: Option<StorageKind>,

    /// Use the offline mock ledger by default
    #[arg(long)]
    pub mock: bool,
}

pub fn execute(global: &GlobalArgs, args: InitArgs) -> Result<i32> {
    let base = base_dir()?;
    let path = config_file(global, &base);
    let config = PublisherConfig::load_or_default(&path)?.apply(ConfigOverrides {
        network: args.network,
        topic_id: args.topic,
        operator_id: args.operator_id,
        storage: args.storage,
        mock: args.mock,
    });
    let services = Services::from_config(&config, &base)?;
    let operator = if args.create_topic {
        Some(operator_identity(&config)?)
    } else {
        None
    };

    let outcome = init(&services, config, &path, operator.as_ref())?;

    if global.json {
        print_json(&outcome.config)?;
    } else {
        println!("Wrote {}", outcome.config_path.display());
        if let Some(topic) = outcome.created_topic {
            println!("Created topic {}", topic);
        }
    }
    Ok(0)
}
