//! S3 backend stub; an extension point for a future object-store backend

use super::{PersistRequest, StorageBackend, StorageKind, StorageRef};
use crate::errors::{not_implemented, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct S3Storage;

impl StorageBackend for S3Storage {
    fn kind(&self) -> StorageKind {
        StorageKind::S3
    }

    fn persist(&self, _request: &PersistRequest<'_>) -> Result<StorageRef> {
        Err(not_implemented("s3", "persist_snapshot"))
    }

    fn resolve(&self, _reference: &StorageRef) -> Result<Vec<u8>> {
        Err(not_implemented("s3", "resolve_storage"))
    }
}
