//! Typed identifiers
//!
//! - `DatasetId`: UUIDv4, stable across every version of a logical dataset
//! - `TopicId` / `AccountId`: ledger entity ids in `shard.realm.num` form
//! - `Version`: identity of one snapshot within a dataset

use crate::errors::PublisherError;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of a logical dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Mint a fresh id (first publish of a dataset)
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DatasetId {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PublisherError::InvalidIdentifier {
            kind: "dataset id",
            value: s.to_string(),
        };
        let uuid = Uuid::parse_str(s.trim()).map_err(|_| invalid())?;
        if uuid.get_version_num() != 4 {
            return Err(invalid());
        }
        Ok(Self(uuid))
    }
}

impl TryFrom<String> for DatasetId {
    type Error = PublisherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatasetId> for String {
    fn from(id: DatasetId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// `shard.realm.num` triple shared by every ledger entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityNum {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityNum {
    fn parse(s: &str, kind: &'static str) -> Result<Self, PublisherError> {
        let invalid = || PublisherError::InvalidIdentifier {
            kind,
            value: s.to_string(),
        };
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64, PublisherError> {
            parts
                .next()
                .and_then(|p| p.parse::<u64>().ok())
                .ok_or_else(invalid)
        };
        let shard = next()?;
        let realm = next()?;
        let num = next()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { shard, realm, num })
    }
}

impl fmt::Display for EntityNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(EntityNum);

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityNum { shard, realm, num })
            }

            pub fn entity(&self) -> EntityNum {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = PublisherError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                EntityNum::parse(s, $kind).map(Self)
            }
        }

        impl TryFrom<String> for $name {
            type Error = PublisherError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Ledger topic (append-only ordered channel)
    TopicId,
    "topic id"
);

entity_id!(
    /// Ledger account; the operator that signs and pays for submissions
    AccountId,
    "account id"
);

/// Identity of one snapshot within a dataset
///
/// Published versions are the compose-time instant rendered as ISO-8601 with
/// millisecond precision (`2024-01-01T00:00:00.000Z`), which sorts
/// lexicographically in time order. Versions read back from the ledger are
/// kept verbatim, so a consensus timestamp string is also a valid `Version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn from_instant(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Pick the version for a new publish
    ///
    /// Strictly greater than `latest` when given: if the clock has not moved
    /// past the latest version's instant, the new one is bumped 1 ms beyond it.
    pub fn next_after(now: DateTime<Utc>, latest: Option<&Version>) -> Self {
        let floor = latest.and_then(Version::instant);
        match floor {
            Some(prev) if now <= prev => Self::from_instant(prev + Duration::milliseconds(1)),
            _ => Self::from_instant(now),
        }
    }

    /// Instant encoded by this version, when it is an ISO-8601 timestamp
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
