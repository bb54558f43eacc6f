#![allow(clippy::unwrap_used, clippy::expect_used)]

use hdp_core::errors::ExErrorKind;
use hdp_core::errors::Result;
use hdp_core::snapshot::{build_from_csv, build_from_sql, ColumnSpec, ResultSet, SqlSource, SqlValue};
use hdp_core::snapshot::digest::{canonical_content_hash, sha256_hex};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const REFERENCE_CSV: &[u8] = b"id,name\n1,Alice\n2,Bob\n";

#[test]
fn test_reference_file_rows_columns_and_hash() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.csv");
    fs::write(&path, REFERENCE_CSV).unwrap();

    let snap = build_from_csv(&path).unwrap();

    assert_eq!(snap.rows(), 2);
    assert_eq!(snap.columns(), 2);
    assert_eq!(snap.content_hash(), sha256_hex(REFERENCE_CSV));
    assert_eq!(snap.source_path(), Some(path.as_path()));
}

#[test]
fn test_repeated_builds_are_bit_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.csv");
    fs::write(&path, REFERENCE_CSV).unwrap();

    let first = build_from_csv(&path).unwrap();
    let second = build_from_csv(&path).unwrap();

    assert_eq!(first.bytes(), second.bytes());
    assert_eq!(first.content_hash(), second.content_hash());
    assert_eq!(first.schema_hash(), second.schema_hash());
}

#[test]
fn test_missing_file_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let err = build_from_csv(&dir.path().join("nope.csv")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
}

#[test]
fn test_build_does_not_touch_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crlf.csv");
    fs::write(&path, b"id,name\r\n1,Alice\r\n").unwrap();

    let snap = build_from_csv(&path).unwrap();

    assert_eq!(snap.bytes(), b"id,name\n1,Alice\n");
    assert_eq!(fs::read(&path).unwrap(), b"id,name\r\n1,Alice\r\n");
}

fn csv_body() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec("[a-z0-9]{1,8},[a-z0-9]{1,8}", 1..20).prop_map(|rows| {
        let mut out = b"k,v\n".to_vec();
        for row in rows {
            out.extend_from_slice(row.as_bytes());
            out.push(b'\n');
        }
        out
    })
}

proptest! {
    #[test]
    fn prop_content_hash_is_deterministic(body in csv_body()) {
        let a = hdp_core::snapshot::csv_source::build_from_csv_bytes(&body, "a").unwrap();
        let b = hdp_core::snapshot::csv_source::build_from_csv_bytes(&body, "b").unwrap();
        prop_assert_eq!(a.content_hash(), b.content_hash());
        prop_assert_eq!(a.content_hash(), canonical_content_hash(&body));
    }

    #[test]
    fn prop_single_byte_flip_changes_hash(
        body in csv_body(),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let snap = hdp_core::snapshot::csv_source::build_from_csv_bytes(&body, "p").unwrap();
        let mut tampered = snap.bytes().to_vec();
        let i = index.index(tampered.len());
        tampered[i] ^= flip;
        prop_assert_ne!(canonical_content_hash(&tampered), snap.content_hash().to_string());
    }
}

struct RowsSource(ResultSet);

impl SqlSource for RowsSource {
    fn describe(&self) -> String {
        "rows".to_string()
    }

    fn run_query(&mut self, _query: &str) -> Result<ResultSet> {
        Ok(self.0.clone())
    }
}

proptest! {
    #[test]
    fn prop_sql_hash_equals_recomputed_hash_of_stored_bytes(
        cells in prop::collection::vec("[a-z,\"\r\n]{0,10}", 1..10),
    ) {
        let rows = cells.into_iter().map(|c| vec![SqlValue::Text(c)]).collect();
        let mut source = RowsSource(ResultSet {
            columns: vec![ColumnSpec::named("text")],
            rows,
        });
        let snap = build_from_sql(&mut source, "q").unwrap();
        prop_assert_eq!(snap.content_hash(), canonical_content_hash(snap.bytes()));
    }
}
