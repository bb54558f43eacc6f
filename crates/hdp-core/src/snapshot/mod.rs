//! Snapshot Builder
//!
//! Turns a CSV file or a SQL result set into a canonical byte sequence plus
//! two digests. A `Snapshot` is immutable once built.
//!
//! ## Canonicalization
//!
//! 1. Column order is kept exactly as the source delivers it
//! 2. Row order is kept exactly as the source delivers it (for SQL sources
//!    that means driver order: add an `ORDER BY` if you need it stable)
//! 3. Text is UTF-8 and every CRLF line ending becomes LF
//! 4. `content_hash` = SHA-256 over the resulting bytes
//! 5. `schema_hash` = SHA-256 over the canonical column list (with declared
//!    types when the source has them)

pub mod canonical;
pub mod csv_source;
pub mod digest;
pub mod sql;

pub use csv_source::build_from_csv;
pub use sql::{build_from_sql, ResultSet, SqlSource, SqlValue};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of source a snapshot was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "SQL")]
    Sql,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Csv => "CSV",
            SourceType::Sql => "SQL",
        }
    }
}

/// One column identifier, optionally with the type the source declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub declared_type: Option<String>,
}

impl ColumnSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type.into()),
        }
    }
}

/// Immutable point-in-time capture of a tabular dataset
#[derive(Debug, Clone)]
pub struct Snapshot {
    bytes: Vec<u8>,
    content_hash: String,
    schema_hash: String,
    rows: u64,
    column_specs: Vec<ColumnSpec>,
    source_type: SourceType,
    source_path: Option<PathBuf>,
}

impl Snapshot {
    /// Assemble a snapshot from already-canonical bytes, computing both digests
    pub(crate) fn from_canonical(
        bytes: Vec<u8>,
        column_specs: Vec<ColumnSpec>,
        rows: u64,
        source_type: SourceType,
        source_path: Option<PathBuf>,
    ) -> Self {
        let content_hash = digest::sha256_hex(&bytes);
        let schema_hash = digest::schema_hash(&column_specs);
        Self {
            bytes,
            content_hash,
            schema_hash,
            rows,
            column_specs,
            source_type,
            source_path,
        }
    }

    /// Canonical bytes (what gets stored off-chain and hashed)
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex SHA-256 of `bytes()`
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn schema_hash(&self) -> &str {
        &self.schema_hash
    }

    /// Number of data rows (header excluded)
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn columns(&self) -> u64 {
        self.column_specs.len() as u64
    }

    pub fn column_specs(&self) -> &[ColumnSpec] {
        &self.column_specs
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Path of the source file, for file-backed sources
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}
