//! hedera-data-publisher CLI
//!
//! Publish tabular datasets with verifiable provenance on a ledger topic.

use clap::{Args, Parser, Subcommand};
use hdp_core::logging_facility::{init as init_logging, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hedera-data-publisher")]
#[command(about = "Publish dataset provenance to a ledger topic and verify it later", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Config file (default: .hedera-data-publisher/config.toml)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the project config, optionally creating a topic
    Init(commands::init::InitArgs),
    /// Snapshot a source and publish its provenance record
    Publish(commands::publish::PublishArgs),
    /// Check a stored snapshot against its published hash
    Verify(commands::verify::VerifyArgs),
    /// List every published version of a dataset
    History(commands::history::HistoryArgs),
}

fn main() {
    let cli = Cli::parse();

    init_logging(if cli.global.log_json {
        Profile::Production
    } else if cli.global.verbose {
        Profile::Development
    } else {
        Profile::Quiet
    });

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(&cli.global, args),
        Commands::Publish(args) => commands::publish::execute(&cli.global, args),
        Commands::Verify(args) => commands::verify::execute(&cli.global, args),
        Commands::History(args) => commands::history::execute(&cli.global, args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
