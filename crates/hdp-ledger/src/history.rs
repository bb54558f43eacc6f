//! History Reader
//!
//! Lazily walks a topic page by page and yields the provenance records that
//! belong to one dataset, in ledger order. Messages that are not provenance
//! records (or belong to other datasets) are skipped. A record whose
//! sequence number was already yielded is dropped, so overlapping pages
//! never produce duplicates.

use crate::anchor::Anchor;
use crate::errors::Result;
use crate::traits::{HistorySource, LedgerRecord, PageCursor};
use hdp_core::ids::{DatasetId, TopicId};
use hdp_core::message::ProvenanceMessage;
use std::collections::VecDeque;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A decoded provenance message with the anchor the ledger gave it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub message: ProvenanceMessage,
    pub anchor: Anchor,
}

pub struct HistoryReader<'a> {
    source: &'a dyn HistorySource,
    topic: TopicId,
    dataset_id: DatasetId,
    page_size: usize,
    next_page: Option<PageCursor>,
    buffer: VecDeque<LedgerRecord>,
    last_sequence: Option<u64>,
    started: bool,
    done: bool,
}

impl<'a> HistoryReader<'a> {
    pub fn new(source: &'a dyn HistorySource, topic: TopicId, dataset_id: DatasetId) -> Self {
        Self {
            source,
            topic,
            dataset_id,
            page_size: DEFAULT_PAGE_SIZE,
            next_page: None,
            buffer: VecDeque::new(),
            last_sequence: None,
            started: false,
            done: false,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Continue a previous walk from the cursor it reported
    pub fn resume_from(mut self, cursor: PageCursor) -> Self {
        self.next_page = Some(cursor);
        self.last_sequence = Some(cursor.after_sequence);
        self.started = true;
        self
    }

    /// Position after the last ledger message consumed so far
    pub fn cursor(&self) -> Option<PageCursor> {
        self.last_sequence.map(|after_sequence| PageCursor { after_sequence })
    }

    fn fill(&mut self) -> Result<bool> {
        if self.started && self.next_page.is_none() {
            return Ok(false);
        }
        let page = self
            .source
            .fetch_page(&self.topic, self.next_page, self.page_size)?;
        self.started = true;
        self.next_page = page.next;
        self.buffer.extend(page.records);
        Ok(true)
    }

    fn accept(&mut self, record: LedgerRecord) -> Option<PublishedRecord> {
        let seq = record.anchor.sequence_number;
        if self.last_sequence.is_some_and(|last| seq <= last) {
            return None;
        }
        self.last_sequence = Some(seq);

        match ProvenanceMessage::decode(&record.payload) {
            Ok(message) if message.dataset_id == self.dataset_id => Some(PublishedRecord {
                message,
                anchor: record.anchor,
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(
                    topic_id = %self.topic,
                    sequence_number = seq,
                    reason = %e,
                    "skipping non-provenance message"
                );
                None
            }
        }
    }
}

impl Iterator for HistoryReader<'_> {
    type Item = Result<PublishedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            while let Some(record) = self.buffer.pop_front() {
                if let Some(published) = self.accept(record) {
                    return Some(Ok(published));
                }
            }
            match self.fill() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Every record for `dataset_id`, oldest first
///
/// # Errors
///
/// The first error reported by the source.
pub fn read_history(
    source: &dyn HistorySource,
    topic: TopicId,
    dataset_id: DatasetId,
    page_size: usize,
) -> Result<Vec<PublishedRecord>> {
    HistoryReader::new(source, topic, dataset_id)
        .with_page_size(page_size)
        .collect()
}

/// Most recent record for `dataset_id`, if any
///
/// # Errors
///
/// The first error reported by the source.
pub fn latest_record(
    source: &dyn HistorySource,
    topic: TopicId,
    dataset_id: DatasetId,
    page_size: usize,
) -> Result<Option<PublishedRecord>> {
    let mut latest = None;
    for record in HistoryReader::new(source, topic, dataset_id).with_page_size(page_size) {
        latest = Some(record?);
    }
    Ok(latest)
}
