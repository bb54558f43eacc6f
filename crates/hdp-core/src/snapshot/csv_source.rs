//! CSV snapshot source

use super::canonical::normalize_line_endings;
use super::{ColumnSpec, Snapshot, SourceType};
use crate::errors::{PublisherError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Build a snapshot from a CSV file on disk
///
/// The first record is the header. Bytes are kept as-is apart from line
/// ending normalization, so the content hash of an LF-terminated UTF-8 file
/// is the SHA-256 of the file itself.
///
/// # Errors
///
/// - `InvalidInput` if the file is missing, unreadable, not UTF-8, or not
///   well-formed CSV (including rows whose field count differs from the header)
/// - `EmptyDataset` if the file has no data rows
pub fn build_from_csv(path: &Path) -> Result<Snapshot> {
    let origin = path.display().to_string();
    let raw = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PublisherError::SourceMissing {
            path: origin.clone(),
        },
        _ => PublisherError::SourceUnreadable {
            path: origin.clone(),
            reason: e.to_string(),
        },
    })?;

    let (bytes, column_specs, rows) = canonicalize_csv(&raw, &origin)?;
    tracing::debug!(
        source = %origin,
        rows,
        columns = column_specs.len(),
        "csv snapshot canonicalized"
    );
    Ok(Snapshot::from_canonical(
        bytes,
        column_specs,
        rows,
        SourceType::Csv,
        Some(path.to_path_buf()),
    ))
}

/// Build a snapshot from in-memory CSV bytes
///
/// # Errors
///
/// Same as [`build_from_csv`], minus file access failures.
pub fn build_from_csv_bytes(raw: &[u8], origin: &str) -> Result<Snapshot> {
    let (bytes, column_specs, rows) = canonicalize_csv(raw, origin)?;
    Ok(Snapshot::from_canonical(
        bytes,
        column_specs,
        rows,
        SourceType::Csv,
        None,
    ))
}

fn canonicalize_csv(raw: &[u8], origin: &str) -> Result<(Vec<u8>, Vec<ColumnSpec>, u64)> {
    if std::str::from_utf8(raw).is_err() {
        return Err(PublisherError::NotUtf8 {
            origin: origin.to_string(),
        }
        .into());
    }
    let canonical = normalize_line_endings(raw).into_owned();

    let malformed = |e: csv::Error| PublisherError::MalformedCsv {
        origin: origin.to_string(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(canonical.as_slice());

    let column_specs: Vec<ColumnSpec> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(ColumnSpec::named)
        .collect();

    let mut rows: u64 = 0;
    for record in reader.records() {
        record.map_err(malformed)?;
        rows += 1;
    }

    if column_specs.is_empty() || rows == 0 {
        return Err(PublisherError::EmptyDataset {
            origin: origin.to_string(),
        }
        .into());
    }

    Ok((canonical, column_specs, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::snapshot::digest::sha256_hex;

    #[test]
    fn test_reference_csv_counts_and_hash() {
        let raw = b"id,name\n1,Alice\n2,Bob\n";
        let snap = build_from_csv_bytes(raw, "inline").unwrap();

        assert_eq!(snap.rows(), 2);
        assert_eq!(snap.columns(), 2);
        assert_eq!(snap.content_hash(), sha256_hex(raw));
        assert_eq!(snap.bytes(), raw);
        assert_eq!(snap.source_type(), SourceType::Csv);
    }

    #[test]
    fn test_crlf_file_hashes_like_lf_file() {
        let lf = build_from_csv_bytes(b"id,name\n1,Alice\n", "lf").unwrap();
        let crlf = build_from_csv_bytes(b"id,name\r\n1,Alice\r\n", "crlf").unwrap();
        assert_eq!(lf.content_hash(), crlf.content_hash());
        assert_eq!(lf.schema_hash(), crlf.schema_hash());
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let err = build_from_csv_bytes(b"id,name\n", "hdr").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::EmptyDataset);
    }

    #[test]
    fn test_empty_file_is_empty_dataset() {
        let err = build_from_csv_bytes(b"", "empty").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::EmptyDataset);
    }

    #[test]
    fn test_ragged_rows_are_invalid_input() {
        let err = build_from_csv_bytes(b"id,name\n1,Alice,extra\n", "ragged").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_non_utf8_is_invalid_input() {
        let err = build_from_csv_bytes(b"id\n\xff\xfe\n", "latin").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_quoted_newline_counts_as_one_row() {
        let snap = build_from_csv_bytes(b"id,note\n1,\"two\nlines\"\n", "quoted").unwrap();
        assert_eq!(snap.rows(), 1);
    }

    #[test]
    fn test_column_order_is_preserved() {
        let a = build_from_csv_bytes(b"b,a\n1,2\n", "ba").unwrap();
        let names: Vec<&str> = a.column_specs().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
