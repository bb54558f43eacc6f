//! Subcommand implementations
//!
//! Each `execute` returns the process exit code on success paths that still
//! need a nonzero code (verify outcomes), or an `ExError` whose kind picks
//! the exit code.

pub mod history;
pub mod init;
pub mod publish;
pub mod verify;

use crate::GlobalArgs;
use hdp_core::errors::{ExError, ExErrorKind, Result};
use hdp_core::hdp_core_types::Sensitive;
use hdp_engine::config::{config_path, operator_key_from_env};
use hdp_engine::{ConfigOverrides, PublisherConfig};
use hdp_ledger::OperatorIdentity;
use std::path::{Path, PathBuf};

/// Directory the command runs against
pub fn base_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("resolve_working_dir")
            .with_message(e.to_string())
    })
}

pub fn config_file(global: &GlobalArgs, base: &Path) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(|| config_path(base))
}

/// File config (or defaults) with command-line overrides applied
pub fn resolve_config(
    global: &GlobalArgs,
    base: &Path,
    overrides: ConfigOverrides,
) -> Result<PublisherConfig> {
    let path = config_file(global, base);
    let config = match &global.config {
        Some(_) => PublisherConfig::load(&path)?,
        None => PublisherConfig::load_or_default(&path)?,
    };
    Ok(config.apply(overrides))
}

/// Operator account from config/flags plus the key from the environment
pub fn operator_identity(config: &PublisherConfig) -> Result<OperatorIdentity> {
    let operator_id = config.require_operator()?;
    let operator_key = operator_key_from_env().unwrap_or_else(|| Sensitive::new(String::new()));
    Ok(OperatorIdentity {
        operator_id,
        operator_key,
    })
}

/// Print a serializable value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
