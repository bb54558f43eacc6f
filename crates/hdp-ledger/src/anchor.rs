//! Ledger acknowledgement types

use hdp_core::errors::PublisherError;
use hdp_core::ids::{AccountId, TopicId, Version};
use hdp_core_types::Sensitive;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Consensus time assigned by the ledger, rendered `seconds.nanoseconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConsensusTimestamp {
    seconds: i64,
    nanos: u32,
}

impl ConsensusTimestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self {
            seconds: seconds + i64::from(nanos / NANOS_PER_SECOND),
            nanos: nanos % NANOS_PER_SECOND,
        }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self::new(at.timestamp(), at.timestamp_subsec_nanos())
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }

    /// The next representable instant
    pub fn successor(&self) -> Self {
        Self::new(self.seconds, self.nanos + 1)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// The timestamp as a lookup key
    pub fn as_version(&self) -> Version {
        Version::from(self.to_string())
    }
}

impl fmt::Display for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for ConsensusTimestamp {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PublisherError::InvalidIdentifier {
            kind: "consensus timestamp",
            value: s.to_string(),
        };
        let (secs, frac) = s.trim().split_once('.').unwrap_or((s.trim(), "0"));
        if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seconds = secs.parse::<i64>().map_err(|_| invalid())?;
        let nanos = format!("{:0<9}", frac).parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(seconds, nanos))
    }
}

impl TryFrom<String> for ConsensusTimestamp {
    type Error = PublisherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConsensusTimestamp> for String {
    fn from(ts: ConsensusTimestamp) -> Self {
        ts.to_string()
    }
}

/// Ledger acknowledgement of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub topic_id: TopicId,
    pub sequence_number: u64,
    pub consensus_timestamp: ConsensusTimestamp,
}

/// Account and signing key that authorize and pay for submissions
///
/// The key never appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct OperatorIdentity {
    pub operator_id: AccountId,
    pub operator_key: Sensitive<String>,
}

impl OperatorIdentity {
    pub fn new(operator_id: AccountId, operator_key: impl Into<String>) -> Self {
        Self {
            operator_id,
            operator_key: Sensitive::new(operator_key.into()),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.operator_key.expose().trim().is_empty()
    }
}
