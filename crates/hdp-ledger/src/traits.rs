//! Ledger boundary
//!
//! The pipeline talks to the ledger only through these two traits, so the
//! mock and any real client are interchangeable.

use crate::anchor::{Anchor, OperatorIdentity};
use crate::errors::Result;
use hdp_core::ids::TopicId;

/// Write side: topic creation and message submission
pub trait LedgerPublisher {
    /// Create a topic and return its id
    ///
    /// # Errors
    ///
    /// `Auth`, `Network`, or `NotImplemented` when the transport is absent.
    fn create_topic(&self, memo: &str, operator: &OperatorIdentity) -> Result<TopicId>;

    /// Submit `payload` to `topic`
    ///
    /// Submissions are atomic: either an anchor comes back or nothing was
    /// recorded.
    ///
    /// # Errors
    ///
    /// `Auth` for rejected credentials, `Network` when unreachable,
    /// `TopicNotFound` for an unknown topic.
    fn publish(&self, topic: &TopicId, payload: &[u8], operator: &OperatorIdentity)
        -> Result<Anchor>;
}

/// One message as stored on the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub anchor: Anchor,
    pub payload: Vec<u8>,
}

/// Position after the last record a caller has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageCursor {
    pub after_sequence: u64,
}

/// One page of topic messages, in ascending sequence order
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<LedgerRecord>,
    /// Where the following page starts; `None` on the last page
    pub next: Option<PageCursor>,
}

/// Read side: paginated, ascending reads of one topic
pub trait HistorySource {
    /// Fetch at most `limit` records with sequence numbers after `after`
    ///
    /// # Errors
    ///
    /// `TopicNotFound` for an unknown topic, `Network` when unreachable.
    fn fetch_page(&self, topic: &TopicId, after: Option<PageCursor>, limit: usize)
        -> Result<Page>;
}
