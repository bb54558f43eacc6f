//! hedera-data-publisher ledger boundary
//!
//! Provides:
//! - `LedgerPublisher` / `HistorySource` traits (the injected ledger collaborators)
//! - `Anchor` and `ConsensusTimestamp`, the ledger's acknowledgement of a submission
//! - `MockLedger`, an offline ledger (in-memory or JSON-lines journal)
//! - `MirrorClient`, a read-only client for the mirror-node REST API
//! - `HistoryReader`, a lazy paginated iterator over one dataset's records

pub mod anchor;
pub mod errors;
pub mod history;
pub mod mirror;
pub mod mock;
pub mod network;
pub mod traits;

pub use anchor::{Anchor, ConsensusTimestamp, OperatorIdentity};
pub use errors::Result;
pub use history::{latest_record, read_history, HistoryReader, PublishedRecord};
pub use mirror::MirrorClient;
pub use mock::MockLedger;
pub use network::{Network, NetworkPublisher};
pub use traits::{HistorySource, LedgerPublisher, LedgerRecord, Page, PageCursor};
