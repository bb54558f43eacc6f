//! Local backend: copies snapshots under the publisher's data directory

use super::atomic::atomic_write;
use super::layout::snapshot_path;
use super::{read_local, PersistRequest, StorageBackend, StorageKind, StorageRef};
use crate::errors::{io_error, storage_collision, Result};
use std::fs;
use std::path::PathBuf;

/// Writes to `<root>/snapshots/<datasetId>/<version>.csv`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl StorageBackend for LocalStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    /// Idempotent for identical bytes; a different snapshot at the same
    /// dataset/version path is an `AlreadyExists` error.
    fn persist(&self, request: &PersistRequest<'_>) -> Result<StorageRef> {
        let target = snapshot_path(&self.root, &request.dataset_id, request.version);
        let target_str = target.display().to_string();
        let content = request.snapshot.bytes();

        if target.exists() {
            let existing =
                fs::read(&target).map_err(|e| io_error("read_snapshot", &target_str, e))?;
            if existing != content {
                return Err(storage_collision(&target_str));
            }
        } else {
            atomic_write(&target, content)?;
        }

        let absolute =
            fs::canonicalize(&target).map_err(|e| io_error("canonicalize_snapshot", &target_str, e))?;
        let reference = StorageRef::for_file(&absolute);
        tracing::debug!(storage_ref = %reference, bytes = content.len(), "snapshot persisted");
        Ok(reference)
    }

    fn resolve(&self, reference: &StorageRef) -> Result<Vec<u8>> {
        read_local(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdp_core::errors::ExErrorKind;
    use hdp_core::ids::{DatasetId, Version};
    use hdp_core::snapshot::csv_source::build_from_csv_bytes;
    use tempfile::TempDir;

    #[test]
    fn test_persist_then_resolve_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let snap = build_from_csv_bytes(b"id\n1\n", "t").unwrap();
        let version = Version::from("2024-01-01T00:00:00.000Z");

        let reference = storage
            .persist(&PersistRequest {
                snapshot: &snap,
                dataset_id: DatasetId::new(),
                version: &version,
            })
            .unwrap();

        assert!(reference.as_str().starts_with("file://"));
        assert_eq!(storage.resolve(&reference).unwrap(), snap.bytes());
    }

    #[test]
    fn test_persist_same_bytes_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let snap = build_from_csv_bytes(b"id\n1\n", "t").unwrap();
        let version = Version::from("v1");
        let request = PersistRequest {
            snapshot: &snap,
            dataset_id: DatasetId::new(),
            version: &version,
        };

        let first = storage.persist(&request).unwrap();
        let second = storage.persist(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_persist_different_bytes_same_version_collides() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let dataset_id = DatasetId::new();
        let version = Version::from("v1");
        let a = build_from_csv_bytes(b"id\n1\n", "a").unwrap();
        let b = build_from_csv_bytes(b"id\n2\n", "b").unwrap();

        storage
            .persist(&PersistRequest {
                snapshot: &a,
                dataset_id,
                version: &version,
            })
            .unwrap();
        let err = storage
            .persist(&PersistRequest {
                snapshot: &b,
                dataset_id,
                version: &version,
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let missing = StorageRef::for_file(&dir.path().join("gone.csv"));

        assert_eq!(
            storage.resolve(&missing).unwrap_err().kind(),
            ExErrorKind::NotFound
        );
    }
}
