//! Storage Backend
//!
//! Persists snapshot bytes off-chain and resolves a reference back to
//! bytes. The variant set is closed: Local, None, and an S3 stub. The
//! backend used for `persist` is chosen by configuration; the backend used
//! for `resolve` is implied by the reference's scheme. Backends never call
//! each other.

mod atomic;
pub mod layout;
mod local;
mod none;
mod s3;

pub use atomic::atomic_write;
pub use local::LocalStorage;
pub use none::NoneStorage;
pub use s3::S3Storage;

use crate::errors::Result;
use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::ids::{DatasetId, Version};
use hdp_core::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Configuration tag selecting a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Local,
    None,
    S3,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Local => "local",
            StorageKind::None => "none",
            StorageKind::S3 => "s3",
        }
    }
}

impl FromStr for StorageKind {
    type Err = ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(StorageKind::Local),
            "none" => Ok(StorageKind::None),
            "s3" => Ok(StorageKind::S3),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("parse_storage_kind")
                .with_message(format!("unknown storage type '{}'", other))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FILE_SCHEME: &str = "file://";
pub const S3_SCHEME: &str = "s3://";

/// Pointer to off-chain snapshot bytes
///
/// Either a `file://` URI (Local backend), an `s3://` URI (S3 stub) or a
/// plain filesystem path (None backend).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageRef(String);

impl StorageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `file://` URI for an absolute path
    pub fn for_file(path: &Path) -> Self {
        Self(format!("{}{}", FILE_SCHEME, path.display()))
    }

    /// Backend implied by the reference's scheme
    pub fn implied_kind(&self) -> StorageKind {
        if self.0.starts_with(FILE_SCHEME) {
            StorageKind::Local
        } else if self.0.starts_with(S3_SCHEME) {
            StorageKind::S3
        } else {
            StorageKind::None
        }
    }

    /// Filesystem path for `file://` refs and plain paths
    pub fn local_path(&self) -> Option<&Path> {
        match self.implied_kind() {
            StorageKind::Local => Some(Path::new(&self.0[FILE_SCHEME.len()..])),
            StorageKind::None => Some(Path::new(&self.0)),
            StorageKind::S3 => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What `persist` needs to place a snapshot
#[derive(Debug, Clone, Copy)]
pub struct PersistRequest<'a> {
    pub snapshot: &'a Snapshot,
    pub dataset_id: DatasetId,
    pub version: &'a Version,
}

/// Capability set {persist, resolve}
pub trait StorageBackend {
    fn kind(&self) -> StorageKind;

    /// Store the snapshot and return a resolvable reference
    ///
    /// # Errors
    ///
    /// `Io` on disk failure, `NotImplemented` for stub backends,
    /// `InvalidInput` when the backend cannot represent the snapshot.
    fn persist(&self, request: &PersistRequest<'_>) -> Result<StorageRef>;

    /// Read the bytes a reference points to
    ///
    /// # Errors
    ///
    /// `NotFound` when the referenced bytes are gone, `Io` on other read
    /// failures, `NotImplemented` for stub backends.
    fn resolve(&self, reference: &StorageRef) -> Result<Vec<u8>>;
}

/// Backend selected by configuration tag, for publishing
pub fn backend_for(kind: StorageKind, local_root: &Path) -> Box<dyn StorageBackend> {
    match kind {
        StorageKind::Local => Box::new(LocalStorage::new(local_root)),
        StorageKind::None => Box::new(NoneStorage),
        StorageKind::S3 => Box::new(S3Storage),
    }
}

/// Backend implied by a reference's scheme, for verification
pub fn backend_for_ref(reference: &StorageRef, local_root: &Path) -> Box<dyn StorageBackend> {
    backend_for(reference.implied_kind(), local_root)
}

/// Shared read path for the filesystem-backed variants
fn read_local(reference: &StorageRef) -> Result<Vec<u8>> {
    let path = reference.local_path().ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("resolve_storage")
            .with_entity_id(reference.as_str())
            .with_message("reference has no filesystem path")
    })?;
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(crate::errors::storage_missing(reference.as_str()))
        }
        Err(e) => Err(crate::errors::io_error(
            "resolve_storage",
            reference.as_str(),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_implies_backend() {
        assert_eq!(
            StorageRef::new("file:///tmp/a.csv").implied_kind(),
            StorageKind::Local
        );
        assert_eq!(
            StorageRef::new("s3://bucket/a.csv").implied_kind(),
            StorageKind::S3
        );
        assert_eq!(
            StorageRef::new("./data/a.csv").implied_kind(),
            StorageKind::None
        );
    }

    #[test]
    fn test_local_path_strips_file_scheme() {
        let r = StorageRef::new("file:///tmp/a.csv");
        assert_eq!(r.local_path(), Some(Path::new("/tmp/a.csv")));
        assert!(StorageRef::new("s3://b/k").local_path().is_none());
    }

    #[test]
    fn test_storage_kind_parse() {
        assert_eq!("LOCAL".parse::<StorageKind>().unwrap(), StorageKind::Local);
        assert_eq!("none".parse::<StorageKind>().unwrap(), StorageKind::None);
        assert_eq!("s3".parse::<StorageKind>().unwrap(), StorageKind::S3);
        assert_eq!(
            "ftp".parse::<StorageKind>().unwrap_err().kind(),
            ExErrorKind::Config
        );
    }
}
