//! SQL snapshot source
//!
//! The relational driver is an injected collaborator behind [`SqlSource`];
//! this module only turns a delivered result set into canonical bytes.
//!
//! Rows are rendered in the order the driver returns them. Most engines do
//! not guarantee an order without `ORDER BY`, so callers that need
//! reproducible hashes across runs must put one in the query.

use super::canonical::normalize_line_endings;
use super::{ColumnSpec, Snapshot, SourceType};
use crate::errors::{ExError, ExErrorKind, PublisherError, Result};

/// A single cell as delivered by the driver
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Canonical text rendering used in the snapshot
    ///
    /// NULL is the empty field, reals use Rust's shortest round-trip form,
    /// blobs are lowercase hex.
    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(s) => s.clone(),
            SqlValue::Blob(b) => hex::encode(b),
        }
    }
}

/// Fully materialized query result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<SqlValue>>,
}

/// Narrow interface to a relational database connection
pub trait SqlSource {
    /// Short label for logs and error context (never includes credentials)
    fn describe(&self) -> String;

    /// Execute `query` and return every row
    ///
    /// # Errors
    ///
    /// `Query` when the statement fails to prepare or execute, `Connection`
    /// when the connection is no longer usable.
    fn run_query(&mut self, query: &str) -> Result<ResultSet>;
}

/// Build a snapshot from a SQL query's result set
///
/// # Errors
///
/// - Whatever the source reports (`Connection`, `Query`)
/// - `EmptyDataset` if the query returns no rows
/// - `Query` if a row's width differs from the column list
pub fn build_from_sql(source: &mut dyn SqlSource, query: &str) -> Result<Snapshot> {
    let origin = source.describe();
    let result = source.run_query(query)?;

    if result.rows.is_empty() {
        return Err(PublisherError::EmptyDataset { origin }.into());
    }

    let rendered = render_result_set(&result).map_err(|e| {
        ExError::new(ExErrorKind::Query)
            .with_op("render_result_set")
            .with_entity_id(origin.clone())
            .with_message(e)
    })?;
    // Text cells may carry CRLF inside quotes; hash what the verifier recomputes
    let bytes = normalize_line_endings(&rendered).into_owned();

    tracing::debug!(
        source = %origin,
        rows = result.rows.len(),
        columns = result.columns.len(),
        "sql snapshot canonicalized"
    );

    let rows = result.rows.len() as u64;
    Ok(Snapshot::from_canonical(
        bytes,
        result.columns,
        rows,
        SourceType::Sql,
        None,
    ))
}

/// Render a result set as CSV: header row, LF terminators, minimal quoting
fn render_result_set(result: &ResultSet) -> std::result::Result<Vec<u8>, String> {
    let width = result.columns.len();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(result.columns.iter().map(|c| c.name.as_str()))
        .map_err(|e| e.to_string())?;

    for (index, row) in result.rows.iter().enumerate() {
        if row.len() != width {
            return Err(format!(
                "row {} has {} values, expected {}",
                index + 1,
                row.len(),
                width
            ));
        }
        writer
            .write_record(row.iter().map(SqlValue::render))
            .map_err(|e| e.to_string())?;
    }

    writer.into_inner().map_err(|e| e.to_string())
}
