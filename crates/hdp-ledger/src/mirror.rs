//! Mirror-node REST client
//!
//! Read-only access to topic messages through
//! `GET {base}/api/v1/topics/{topicId}/messages`, ascending by sequence
//! number. Each page is one blocking request; the next page is never
//! requested before the previous one has been returned to the caller.

use crate::anchor::{Anchor, ConsensusTimestamp};
use crate::errors::{network_error, topic_not_found, Result};
use crate::traits::{HistorySource, LedgerRecord, Page, PageCursor};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::ids::TopicId;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Upper bound the mirror node accepts for `limit`
pub const MAX_PAGE_SIZE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<MirrorMessage>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MirrorMessage {
    consensus_timestamp: ConsensusTimestamp,
    topic_id: TopicId,
    sequence_number: u64,
    message: String,
}

pub struct MirrorClient {
    client: Client,
    base_url: String,
}

impl MirrorClient {
    /// # Errors
    ///
    /// `Internal` if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("build_http_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self, topic: &TopicId, after: Option<PageCursor>, limit: usize) -> String {
        let mut url = format!(
            "{}/api/v1/topics/{}/messages?order=asc&limit={}",
            self.base_url,
            topic,
            limit.clamp(1, MAX_PAGE_SIZE)
        );
        if let Some(cursor) = after {
            url.push_str(&format!("&sequencenumber=gt:{}", cursor.after_sequence));
        }
        url
    }
}

impl HistorySource for MirrorClient {
    fn fetch_page(
        &self,
        topic: &TopicId,
        after: Option<PageCursor>,
        limit: usize,
    ) -> Result<Page> {
        let url = self.messages_url(topic, after, limit);
        tracing::debug!(url = %url, "fetching mirror page");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| network_error("fetch_history_page", &self.base_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, topic, &self.base_url, &body));
        }

        let body = response
            .text()
            .map_err(|e| network_error("fetch_history_page", &self.base_url, e.to_string()))?;
        parse_page(&body)
    }
}

/// Classify a non-success mirror-node answer
///
/// The mirror node answers 404 for a topic it has never seen.
fn status_error(status: StatusCode, topic: &TopicId, base_url: &str, body: &str) -> ExError {
    if status == StatusCode::NOT_FOUND {
        return topic_not_found(topic);
    }
    network_error(
        "fetch_history_page",
        base_url,
        format!("mirror node answered {}: {}", status, body),
    )
}

/// Decode one mirror-node response body
fn parse_page(body: &str) -> Result<Page> {
    let parsed: MessagesResponse = serde_json::from_str(body)?;

    let mut records = Vec::with_capacity(parsed.messages.len());
    for m in parsed.messages {
        let payload = STANDARD.decode(m.message.as_bytes()).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("decode_mirror_message")
                .with_entity_id(format!("{}#{}", m.topic_id, m.sequence_number))
                .with_message(e.to_string())
        })?;
        records.push(LedgerRecord {
            anchor: Anchor {
                topic_id: m.topic_id,
                sequence_number: m.sequence_number,
                consensus_timestamp: m.consensus_timestamp,
            },
            payload,
        });
    }

    let next = match (&parsed.links.next, records.last()) {
        (Some(_), Some(last)) => Some(PageCursor {
            after_sequence: last.anchor.sequence_number,
        }),
        _ => None,
    };
    Ok(Page { records, next })
}
