//! Collaborator wiring
//!
//! Picks the ledger strategy (mock or live network) and the storage backend
//! from a resolved `PublisherConfig`. Nothing downstream knows which
//! strategy it got.

use crate::config::{PublisherConfig, DATA_DIR};
use hdp_core::clock::{Clock, SystemClock};
use hdp_core::errors::Result;
use hdp_ledger::mock::JOURNAL_FILE;
use hdp_ledger::{HistorySource, LedgerPublisher, MirrorClient, MockLedger, NetworkPublisher};
use hdp_store::{backend_for, backend_for_ref, StorageBackend, StorageKind, StorageRef};
use std::path::{Path, PathBuf};

/// Ledger strategy
pub enum Ledger {
    /// Offline; one instance serves both submission and history
    Mock(MockLedger),
    /// Live network: submission transport plus mirror-node reads
    Live {
        publisher: NetworkPublisher,
        mirror: MirrorClient,
    },
}

impl Ledger {
    pub fn publisher(&self) -> &dyn LedgerPublisher {
        match self {
            Ledger::Mock(mock) => mock,
            Ledger::Live { publisher, .. } => publisher,
        }
    }

    pub fn history(&self) -> &dyn HistorySource {
        match self {
            Ledger::Mock(mock) => mock,
            Ledger::Live { mirror, .. } => mirror,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Ledger::Mock(_))
    }
}

pub struct Services {
    pub ledger: Ledger,
    pub clock: Box<dyn Clock>,
    pub storage_kind: StorageKind,
    pub storage_root: PathBuf,
    pub page_size: usize,
}

impl Services {
    /// Build collaborators for `config`, resolving relative paths against `base_dir`
    ///
    /// In mock mode the ledger is backed by
    /// `<base>/.hedera-data-publisher/mock-ledger.jsonl`.
    ///
    /// # Errors
    ///
    /// `Io`/`Serialization` if the mock journal cannot be replayed,
    /// `Internal` if the HTTP client cannot be built.
    pub fn from_config(config: &PublisherConfig, base_dir: &Path) -> Result<Self> {
        let ledger = if config.mock {
            let journal = base_dir.join(DATA_DIR).join(JOURNAL_FILE);
            Ledger::Mock(MockLedger::open_journal(&journal, Box::new(SystemClock))?)
        } else {
            Ledger::Live {
                publisher: NetworkPublisher::new(config.network),
                mirror: MirrorClient::new(&config.mirror_url())?,
            }
        };

        Ok(Self {
            ledger,
            clock: Box::new(SystemClock),
            storage_kind: config.storage.kind,
            storage_root: config.storage_root(base_dir),
            page_size: config.page_size,
        })
    }

    /// Explicit wiring, used by tests and embedders
    pub fn new(ledger: Ledger, clock: Box<dyn Clock>, storage_kind: StorageKind, storage_root: PathBuf) -> Self {
        Self {
            ledger,
            clock,
            storage_kind,
            storage_root,
            page_size: hdp_ledger::history::DEFAULT_PAGE_SIZE,
        }
    }

    /// Backend that `publish` writes through
    pub fn storage(&self) -> Box<dyn StorageBackend> {
        backend_for(self.storage_kind, &self.storage_root)
    }

    /// Backend implied by a published reference
    pub fn storage_for(&self, reference: &StorageRef) -> Box<dyn StorageBackend> {
        backend_for_ref(reference, &self.storage_root)
    }
}
