//! Publisher configuration
//!
//! Loaded from `.hedera-data-publisher/config.toml` when present. CLI flags
//! override file values; file values override defaults. The operator key
//! never lives here: it is read from `HEDERA_OPERATOR_KEY` (optionally via
//! a `.env` file) into a `Sensitive` wrapper.

use hdp_core::errors::{ExError, ExErrorKind, Result};
use hdp_core::ids::{AccountId, TopicId};
use hdp_core_types::Sensitive;
use hdp_ledger::history::DEFAULT_PAGE_SIZE;
use hdp_ledger::Network;
use hdp_store::storage::atomic_write;
use hdp_store::StorageKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-project data directory (config, snapshots, mock journal)
pub const DATA_DIR: &str = ".hedera-data-publisher";
pub const CONFIG_FILE: &str = "config.toml";
pub const OPERATOR_KEY_ENV: &str = "HEDERA_OPERATOR_KEY";

/// `<base>/.hedera-data-publisher/config.toml`
pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(DATA_DIR).join(CONFIG_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    /// Root for the local backend; relative paths resolve against the working directory
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Local,
            root: PathBuf::from(DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,
    pub page_size: usize,
    pub mock: bool,
    pub storage: StorageConfig,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            topic_id: None,
            operator_id: None,
            mirror_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            mock: false,
            storage: StorageConfig::default(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<Network>,
    pub topic_id: Option<TopicId>,
    pub operator_id: Option<AccountId>,
    pub storage: Option<StorageKind>,
    /// `--mock` can only switch mock mode on
    pub mock: bool,
}

impl PublisherConfig {
    /// Parse a config file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::parse(&text).map_err(|e| e.with_entity_id(path.display().to_string()))
    }

    /// Config at `path`, or defaults when the file does not exist
    ///
    /// # Errors
    ///
    /// See [`PublisherConfig::load`].
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// # Errors
    ///
    /// `Config` if `text` is not a valid config document.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("parse_config")
                .with_message(e.to_string())
        })
    }

    /// # Errors
    ///
    /// `Config` if serialization fails, `Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("save_config")
                .with_message(e.to_string())
        })?;
        atomic_write(path, text.as_bytes())
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(network) = overrides.network {
            self.network = network;
        }
        if let Some(topic_id) = overrides.topic_id {
            self.topic_id = Some(topic_id);
        }
        if let Some(operator_id) = overrides.operator_id {
            self.operator_id = Some(operator_id);
        }
        if let Some(kind) = overrides.storage {
            self.storage.kind = kind;
        }
        self.mock |= overrides.mock;
        self
    }

    /// Effective mirror endpoint: explicit override or the network default
    pub fn mirror_url(&self) -> String {
        self.mirror_url
            .clone()
            .unwrap_or_else(|| self.network.default_mirror_url().to_string())
    }

    pub fn storage_root(&self, base_dir: &Path) -> PathBuf {
        if self.storage.root.is_absolute() {
            self.storage.root.clone()
        } else {
            base_dir.join(&self.storage.root)
        }
    }

    /// # Errors
    ///
    /// `Config` when no topic was given on the command line or in the file.
    pub fn require_topic(&self) -> Result<TopicId> {
        self.topic_id.ok_or_else(|| {
            ExError::new(ExErrorKind::Config)
                .with_op("resolve_config")
                .with_message("no topic id: pass --topic or run `init --create-topic`")
        })
    }

    /// # Errors
    ///
    /// `Config` when no operator account was given.
    pub fn require_operator(&self) -> Result<AccountId> {
        self.operator_id.ok_or_else(|| {
            ExError::new(ExErrorKind::Config)
                .with_op("resolve_config")
                .with_message("no operator id: pass --operator-id or set operator_id in config")
        })
    }
}

/// Read the operator key from the environment, loading `.env` first
///
/// Returns `None` when the variable is unset or empty.
pub fn operator_key_from_env() -> Option<Sensitive<String>> {
    // A missing .env file is the common case.
    let _ = dotenvy::dotenv();
    std::env::var(OPERATOR_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(Sensitive::new)
}
