//! Offline ledger
//!
//! Synthesizes structurally valid anchors without any network call:
//! per-topic sequence numbers start at 1, consensus timestamps strictly
//! increase across the whole ledger. State lives in memory, optionally
//! mirrored to an append-only JSON-lines journal so separate processes
//! observe the same history.

use crate::anchor::{Anchor, ConsensusTimestamp, OperatorIdentity};
use crate::errors::{auth_error, journal_corrupt, journal_error, topic_not_found, Result};
use crate::traits::{HistorySource, LedgerPublisher, LedgerRecord, Page, PageCursor};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hdp_core::clock::{Clock, SystemClock};
use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::ids::TopicId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Mock topics are numbered from here (`0.0.1001`, `0.0.1002`, ...)
pub const MOCK_TOPIC_BASE: u64 = 1000;

pub const JOURNAL_FILE: &str = "mock-ledger.jsonl";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JournalEntry {
    #[serde(rename_all = "camelCase")]
    Topic { topic_id: TopicId, memo: String },
    #[serde(rename_all = "camelCase")]
    Message {
        topic_id: TopicId,
        sequence_number: u64,
        consensus_timestamp: ConsensusTimestamp,
        payload: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    topics: BTreeMap<TopicId, Vec<LedgerRecord>>,
    last_topic_num: u64,
    last_consensus: Option<ConsensusTimestamp>,
}

impl MockState {
    fn register_topic(&mut self, topic: TopicId) {
        self.topics.entry(topic).or_default();
        if topic.entity().shard == 0 && topic.entity().realm == 0 {
            self.last_topic_num = self.last_topic_num.max(topic.entity().num);
        }
    }

    fn apply(&mut self, entry: JournalEntry) -> std::result::Result<(), String> {
        match entry {
            JournalEntry::Topic { topic_id, .. } => {
                self.register_topic(topic_id);
                Ok(())
            }
            JournalEntry::Message {
                topic_id,
                sequence_number,
                consensus_timestamp,
                payload,
            } => {
                let payload = STANDARD.decode(payload).map_err(|e| e.to_string())?;
                self.register_topic(topic_id);
                self.last_consensus = self.last_consensus.max(Some(consensus_timestamp));
                if let Some(records) = self.topics.get_mut(&topic_id) {
                    records.push(LedgerRecord {
                        anchor: Anchor {
                            topic_id,
                            sequence_number,
                            consensus_timestamp,
                        },
                        payload,
                    });
                }
                Ok(())
            }
        }
    }
}

pub struct MockLedger {
    state: Mutex<MockState>,
    clock: Box<dyn Clock>,
    journal: Option<PathBuf>,
    auto_create_topics: bool,
    require_operator_key: bool,
}

impl MockLedger {
    /// In-memory ledger on the system clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(MockState {
                last_topic_num: MOCK_TOPIC_BASE,
                ..MockState::default()
            }),
            clock,
            journal: None,
            auto_create_topics: true,
            require_operator_key: false,
        }
    }

    /// Ledger backed by a journal file, replaying whatever it already holds
    ///
    /// # Errors
    ///
    /// `Io` if the journal cannot be read, `Serialization` for a corrupt line.
    pub fn open_journal(path: &Path, clock: Box<dyn Clock>) -> Result<Self> {
        let mut ledger = Self::with_clock(clock);
        let label = path.display().to_string();

        match fs::read_to_string(path) {
            Ok(contents) => {
                let state = ledger.state.get_mut().map_err(|_| poisoned())?;
                for (index, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let entry: JournalEntry = serde_json::from_str(line)
                        .map_err(|e| journal_corrupt(&label, index + 1, e))?;
                    state
                        .apply(entry)
                        .map_err(|e| journal_corrupt(&label, index + 1, e))?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(journal_error("replay_mock_journal", &label, e)),
        }

        tracing::debug!(journal = %label, "mock ledger opened");
        ledger.journal = Some(path.to_path_buf());
        Ok(ledger)
    }

    /// Refuse submissions for unknown topics instead of creating them
    pub fn strict_topics(mut self) -> Self {
        self.auto_create_topics = false;
        self
    }

    /// Reject operators without a signing key
    pub fn require_operator_key(mut self) -> Self {
        self.require_operator_key = true;
        self
    }

    /// Number of messages on a topic
    pub fn message_count(&self, topic: &TopicId) -> usize {
        self.lock()
            .map(|s| s.topics.get(topic).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>> {
        self.state.lock().map_err(|_| poisoned())
    }

    fn check_operator(&self, operation: &str, operator: &OperatorIdentity) -> Result<()> {
        if self.require_operator_key && !operator.has_key() {
            return Err(auth_error(operation, "operator key is required"));
        }
        Ok(())
    }

    fn append(&self, entry: &JournalEntry) -> Result<()> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let label = path.display().to_string();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| journal_error("append_mock_journal", &label, e))?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| journal_error("append_mock_journal", &label, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| journal_error("append_mock_journal", &label, e))?;
        Ok(())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerPublisher for MockLedger {
    fn create_topic(&self, memo: &str, operator: &OperatorIdentity) -> Result<TopicId> {
        self.check_operator("create_topic", operator)?;
        let mut state = self.lock()?;
        let topic = TopicId::new(0, 0, state.last_topic_num + 1);
        self.append(&JournalEntry::Topic {
            topic_id: topic,
            memo: memo.to_string(),
        })?;
        state.register_topic(topic);
        tracing::info!(topic_id = %topic, "mock topic created");
        Ok(topic)
    }

    fn publish(
        &self,
        topic: &TopicId,
        payload: &[u8],
        operator: &OperatorIdentity,
    ) -> Result<Anchor> {
        self.check_operator("submit_message", operator)?;
        let mut state = self.lock()?;

        let known = state.topics.contains_key(topic);
        if !known && !self.auto_create_topics {
            return Err(topic_not_found(topic));
        }

        let now = ConsensusTimestamp::from_datetime(self.clock.now());
        let consensus_timestamp = match state.last_consensus {
            Some(last) if now <= last => last.successor(),
            _ => now,
        };
        let sequence_number = state.topics.get(topic).map_or(0, Vec::len) as u64 + 1;
        let anchor = Anchor {
            topic_id: *topic,
            sequence_number,
            consensus_timestamp,
        };

        // Journal first: a failed append leaves in-memory state untouched.
        self.append(&JournalEntry::Message {
            topic_id: *topic,
            sequence_number,
            consensus_timestamp,
            payload: STANDARD.encode(payload),
        })?;

        state.register_topic(*topic);
        state.last_consensus = Some(consensus_timestamp);
        if let Some(records) = state.topics.get_mut(topic) {
            records.push(LedgerRecord {
                anchor: anchor.clone(),
                payload: payload.to_vec(),
            });
        }

        tracing::info!(
            topic_id = %topic,
            sequence_number,
            consensus_timestamp = %consensus_timestamp,
            "mock submission accepted"
        );
        Ok(anchor)
    }
}

impl HistorySource for MockLedger {
    fn fetch_page(
        &self,
        topic: &TopicId,
        after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page> {
        let state = self.lock()?;
        let records = state.topics.get(topic).ok_or_else(|| topic_not_found(topic))?;
        let floor = after.map_or(0, |c| c.after_sequence);

        let mut remaining = records
            .iter()
            .filter(|r| r.anchor.sequence_number > floor)
            .peekable();
        let page: Vec<LedgerRecord> = remaining.by_ref().take(limit.max(1)).cloned().collect();
        let next = match (remaining.peek(), page.last()) {
            (Some(_), Some(last)) => Some(PageCursor {
                after_sequence: last.anchor.sequence_number,
            }),
            _ => None,
        };

        Ok(Page {
            records: page,
            next,
        })
    }
}

fn poisoned() -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("lock_mock_ledger")
        .with_message("mock ledger state lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hdp_core::clock::FixedClock;
    use hdp_core::ids::AccountId;
    use tempfile::TempDir;

    fn operator() -> OperatorIdentity {
        OperatorIdentity::new(AccountId::new(0, 0, 2), "")
    }

    fn frozen() -> Box<dyn Clock> {
        Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_anchors_are_sequential_and_strictly_increasing() {
        let ledger = MockLedger::with_clock(frozen());
        let topic = TopicId::new(0, 0, 1234);

        let a = ledger.publish(&topic, b"one", &operator()).unwrap();
        let b = ledger.publish(&topic, b"two", &operator()).unwrap();

        assert_eq!(a.sequence_number, 1);
        assert_eq!(b.sequence_number, 2);
        assert!(b.consensus_timestamp > a.consensus_timestamp);
        assert_eq!(a.consensus_timestamp.to_string(), "1704067200.000000000");
    }

    #[test]
    fn test_create_topic_synthesizes_ids() {
        let ledger = MockLedger::new();
        let first = ledger.create_topic("m", &operator()).unwrap();
        let second = ledger.create_topic("m", &operator()).unwrap();
        assert_eq!(first, TopicId::new(0, 0, MOCK_TOPIC_BASE + 1));
        assert_eq!(second, TopicId::new(0, 0, MOCK_TOPIC_BASE + 2));
    }

    #[test]
    fn test_strict_topics_rejects_unknown() {
        let ledger = MockLedger::new().strict_topics();
        let err = ledger
            .publish(&TopicId::new(0, 0, 9), b"x", &operator())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TopicNotFound);
    }

    #[test]
    fn test_required_key_rejects_empty_key() {
        let ledger = MockLedger::new().require_operator_key();
        let err = ledger
            .publish(&TopicId::new(0, 0, 9), b"x", &operator())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Auth);
    }

    #[test]
    fn test_pages_split_at_limit() {
        let ledger = MockLedger::new();
        let topic = TopicId::new(0, 0, 1);
        for i in 0..5u8 {
            ledger.publish(&topic, &[i], &operator()).unwrap();
        }

        let first = ledger.fetch_page(&topic, None, 2).unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.next, Some(PageCursor { after_sequence: 2 }));

        let last = ledger
            .fetch_page(&topic, Some(PageCursor { after_sequence: 4 }), 2)
            .unwrap();
        assert_eq!(last.records.len(), 1);
        assert!(last.next.is_none());
    }

    #[test]
    fn test_unknown_topic_history_is_topic_not_found() {
        let ledger = MockLedger::new();
        let err = ledger.fetch_page(&TopicId::new(0, 0, 5), None, 10).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TopicNotFound);
    }

    #[test]
    fn test_journal_replays_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(JOURNAL_FILE);
        let topic = {
            let ledger = MockLedger::open_journal(&path, frozen()).unwrap();
            let topic = ledger.create_topic("memo", &operator()).unwrap();
            ledger.publish(&topic, b"payload", &operator()).unwrap();
            topic
        };

        let reopened = MockLedger::open_journal(&path, frozen()).unwrap();
        assert_eq!(reopened.message_count(&topic), 1);

        let next = reopened.publish(&topic, b"again", &operator()).unwrap();
        assert_eq!(next.sequence_number, 2);
        assert!(next.consensus_timestamp.to_string() > "1704067200.000000000".to_string());

        let fresh_topic = reopened.create_topic("memo", &operator()).unwrap();
        assert_ne!(fresh_topic, topic);
    }

    #[test]
    fn test_corrupt_journal_line_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(JOURNAL_FILE);
        fs::write(&path, "{not json}\n").unwrap();

        let err = MockLedger::open_journal(&path, frozen()).err().unwrap();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
