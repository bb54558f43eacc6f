//! `verify`

use super::{base_dir, print_json, resolve_config};
use crate::GlobalArgs;
use clap::Args;
use hdp_core::errors::Result;
use hdp_core::ids::{DatasetId, TopicId, Version};
use hdp_engine::commands::{verify, VerificationResult, VerifyLocator};
use hdp_engine::{ConfigOverrides, Services};
use hdp_ledger::Network;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub dataset_id: DatasetId,

    /// Message version or consensus timestamp (default: latest)
    #[arg(long)]
    pub version: Option<String>,

    #[arg(long)]
    pub topic: Option<TopicId>,

    #[arg(long)]
    pub network: Option<Network>,

    #[arg(long)]
    pub mock: bool,
}

/// Exit code 0 on MATCH, 10 on MISMATCH, 11 on NOT_FOUND
pub fn execute(global: &GlobalArgs, args: VerifyArgs) -> Result<i32> {
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

    let result = verify(
        &services,
        &VerifyLocator {
            dataset_id: args.dataset_id,
            version: args.version.map(Version::from),
            topic_id,
        },
    )?;

    if global.json {
        print_json(&result)?;
    } else {
        print_report(&result);
    }
    Ok(result.status.exit_code())
}

fn print_report(result: &VerificationResult) {
    println!("{}", result.status.as_str());
    println!("  dataset:    {}", result.dataset_id);
    if let Some(version) = &result.version {
        println!("  version:    {}", version);
    }
    if let Some(expected) = &result.expected_hash {
        println!("  expected:   {}", expected);
    }
    if let Some(actual) = &result.actual_hash {
        println!("  actual:     {}", actual);
    }
    if let Some(reference) = &result.storage_ref {
        println!("  storage:    {}", reference);
    }
    if let Some(detail) = &result.detail {
        println!("  {}", detail);
    }
}
