//! `publish csv` / `publish sql`

use super::{base_dir, operator_identity, print_json, resolve_config};
use crate::GlobalArgs;
use clap::{Args, Subcommand};
use hdp_core::errors::Result;
use hdp_core::ids::{AccountId, DatasetId, TopicId};
use hdp_engine::commands::{publish_csv, publish_sql, PublishContext, PublishResult};
use hdp_engine::{ConfigOverrides, Services};
use hdp_ledger::Network;
use hdp_store::sql::open_source;
use hdp_store::StorageKind;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PublishArgs {
    #[command(subcommand)]
    pub source: PublishSource,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Subcommand)]
pub enum PublishSource {
    /// Publish a CSV file
    Csv {
        path: PathBuf,
    },
    /// Publish the result of a SQL query
    Sql {
        /// Connection string, e.g. sqlite://data/app.db
        #[arg(long)]
        conn: String,

        /// Query to snapshot; add ORDER BY for reproducible hashes
        #[arg(long)]
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    #[arg(long, global = true)]
    pub topic: Option<TopicId>,

    #[arg(long, global = true)]
    pub operator_id: Option<AccountId>,

    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Use the offline mock ledger
    #[arg(long, global = true)]
    pub mock: bool,

    /// Publish a new version of an existing dataset
    #[arg(long, global = true)]
    pub dataset_id: Option<DatasetId>,

    /// Storage backend: local, none or s3
    #[arg(long, global = true)]
    pub storage: Option<StorageKind>,
}

pub fn execute(global: &GlobalArgs, args: PublishArgs) -> Result<i32> {
    let base = base_dir()?;
    let target = args.target;
    let config = resolve_config(
        global,
        &base,
        ConfigOverrides {
            network: target.network,
            topic_id: target.topic,
            operator_id: target.operator_id,
            storage: target.storage,
            mock: target.mock,
        },
    )?;
    let topic_id = config.require_topic()?;
    let operator = operator_identity(&config)?;
    let services = Services::from_config(&config, &base)?;
    let ctx = PublishContext {
        services: &services,
        operator: &operator,
        topic_id,
    };

    let result = match args.source {
        PublishSource::Csv { path } => publish_csv(&ctx, &path, target.dataset_id)?,
        PublishSource::Sql { conn, query } => {
            let mut source = open_source(&conn)?;
            publish_sql(&ctx, source.as_mut(), &query, target.dataset_id)?
        }
    };

    if global.json {
        print_json(&result)?;
    } else {
        print_summary(&result, services.ledger.is_mock());
    }
    Ok(0)
}

fn print_summary(result: &PublishResult, mock: bool) {
    println!(
        "Published dataset {}{}",
        result.dataset_id,
        if mock { " (mock ledger)" } else { "" }
    );
    println!("  version:    {}", result.version);
    println!("  topic:      {}", result.topic_id);
    println!("  sequence:   {}", result.anchor.sequence_number);
    println!("  consensus:  {}", result.anchor.consensus_timestamp);
    println!("  storage:    {}", result.storage_ref);
    println!("  sha256:     {}", result.hash);
    println!("  rows:       {}", result.message.rows);
    println!("  columns:    {}", result.message.columns);
}
