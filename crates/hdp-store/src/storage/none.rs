//! None backend: the caller's original file is the storage
//!
//! No copy is made. If the caller later moves or deletes the file,
//! verification reports the snapshot as missing rather than tampered.

use super::{read_local, PersistRequest, StorageBackend, StorageKind, StorageRef};
use crate::errors::Result;
use hdp_core::errors::{ExError, ExErrorKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoneStorage;

impl StorageBackend for NoneStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::None
    }

    fn persist(&self, request: &PersistRequest<'_>) -> Result<StorageRef> {
        let path = request.snapshot.source_path().ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("persist_snapshot")
                .with_entity_id(request.dataset_id.to_string())
                .with_message("storage type 'none' needs a file source; use 'local' for SQL sources")
        })?;
        Ok(StorageRef::new(path.display().to_string()))
    }

    fn resolve(&self, reference: &StorageRef) -> Result<Vec<u8>> {
        read_local(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdp_core::ids::{DatasetId, Version};
    use hdp_core::snapshot::build_from_csv;
    use hdp_core::snapshot::csv_source::build_from_csv_bytes;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_persist_returns_source_path_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src.csv");
        fs::write(&path, b"id\n1\n").unwrap();
        let snap = build_from_csv(&path).unwrap();
        let version = Version::from("v1");

        let reference = NoneStorage
            .persist(&PersistRequest {
                snapshot: &snap,
                dataset_id: DatasetId::new(),
                version: &version,
            })
            .unwrap();

        assert_eq!(reference.as_str(), path.display().to_string());
        assert_eq!(NoneStorage.resolve(&reference).unwrap(), b"id\n1\n");
    }

    #[test]
    fn test_persist_without_source_path_is_invalid() {
        let snap = build_from_csv_bytes(b"id\n1\n", "mem").unwrap();
        let version = Version::from("v1");

        let err = NoneStorage
            .persist(&PersistRequest {
                snapshot: &snap,
                dataset_id: DatasetId::new(),
                version: &version,
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_deleted_source_resolves_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src.csv");
        fs::write(&path, b"id\n1\n").unwrap();
        let reference = StorageRef::new(path.display().to_string());
        fs::remove_file(&path).unwrap();

        assert_eq!(
            NoneStorage.resolve(&reference).unwrap_err().kind(),
            ExErrorKind::NotFound
        );
    }
}
