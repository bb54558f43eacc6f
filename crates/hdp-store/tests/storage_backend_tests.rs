// Integration tests for the storage backends
// Covers persist/resolve per backend and reference-scheme dispatch

use hdp_core::errors::ExErrorKind;
use hdp_core::ids::{DatasetId, Version};
use hdp_core::snapshot::build_from_csv;
use hdp_store::{backend_for, backend_for_ref, PersistRequest, StorageKind, StorageRef};
use std::fs;
use tempfile::TempDir;

fn write_source(dir: &TempDir, body: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("people.csv");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_local_persist_copies_canonical_bytes_under_root() {
    // Given: a CRLF source and a local backend rooted in a temp dir
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, b"id,name\r\n1,Alice\r\n");
    let snapshot = build_from_csv(&source).unwrap();
    let root = dir.path().join(".hedera-data-publisher");
    let backend = backend_for(StorageKind::Local, &root);
    let version = Version::from("2024-01-01T00:00:00.000Z");

    // When: we persist
    let reference = backend
        .persist(&PersistRequest {
            snapshot: &snapshot,
            dataset_id: DatasetId::new(),
            version: &version,
        })
        .unwrap();

    // Then: the stored copy holds the canonical (LF) bytes, not the source bytes
    let stored = reference.local_path().unwrap();
    assert!(stored.starts_with(fs::canonicalize(&root).unwrap()));
    assert_eq!(fs::read(stored).unwrap(), b"id,name\n1,Alice\n");
    assert!(stored
        .to_string_lossy()
        .ends_with("2024-01-01T00-00-00.000Z.csv"));
}

#[test]
fn test_local_copy_survives_source_deletion() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, b"id\n1\n");
    let snapshot = build_from_csv(&source).unwrap();
    let root = dir.path().join("store");
    let backend = backend_for(StorageKind::Local, &root);
    let version = Version::from("v1");

    let reference = backend
        .persist(&PersistRequest {
            snapshot: &snapshot,
            dataset_id: DatasetId::new(),
            version: &version,
        })
        .unwrap();
    fs::remove_file(&source).unwrap();

    let resolver = backend_for_ref(&reference, &root);
    assert_eq!(resolver.kind(), StorageKind::Local);
    assert_eq!(resolver.resolve(&reference).unwrap(), b"id\n1\n");
}

#[test]
fn test_none_backend_reference_tracks_caller_file() {
    // Given: a None-backed publish
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, b"id\n1\n");
    let snapshot = build_from_csv(&source).unwrap();
    let backend = backend_for(StorageKind::None, dir.path());
    let version = Version::from("v1");
    let reference = backend
        .persist(&PersistRequest {
            snapshot: &snapshot,
            dataset_id: DatasetId::new(),
            version: &version,
        })
        .unwrap();

    // Then: the reference is the plain path and resolves through the None backend
    assert_eq!(reference.implied_kind(), StorageKind::None);
    let resolver = backend_for_ref(&reference, dir.path());
    assert_eq!(resolver.resolve(&reference).unwrap(), b"id\n1\n");

    // When: the caller edits the file, resolve returns the edited bytes
    fs::write(&source, b"id\n2\n").unwrap();
    assert_eq!(resolver.resolve(&reference).unwrap(), b"id\n2\n");

    // When: the caller deletes it, resolve reports NotFound
    fs::remove_file(&source).unwrap();
    assert_eq!(
        resolver.resolve(&reference).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_s3_reference_dispatches_to_stub() {
    let dir = TempDir::new().unwrap();
    let reference = StorageRef::new("s3://bucket/snapshots/x.csv");
    let resolver = backend_for_ref(&reference, dir.path());

    assert_eq!(resolver.kind(), StorageKind::S3);
    assert_eq!(
        resolver.resolve(&reference).unwrap_err().kind(),
        ExErrorKind::NotImplemented
    );
}
