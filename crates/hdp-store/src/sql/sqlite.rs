//! SQLite driver for `SqlSource`

use crate::errors::{connection_error, non_utf8_cell, query_error, Result};
use hdp_core::snapshot::{ColumnSpec, ResultSet, SqlSource, SqlValue};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

const SCHEME: &str = "sqlite://";

/// Read-only connection to a SQLite database file
#[derive(Debug)]
pub struct SqliteSource {
    path: PathBuf,
    conn: Connection,
}

impl SqliteSource {
    /// Open `sqlite://relative/path.db` or `sqlite:///absolute/path.db`
    ///
    /// # Errors
    ///
    /// `Connection` if the string has the wrong scheme or the file cannot be
    /// opened read-only.
    pub fn open(connection: &str) -> Result<Self> {
        let path = connection
            .strip_prefix(SCHEME)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| connection_error(connection, "expected sqlite://<path>"))?;
        Self::open_path(Path::new(path))
    }

    /// Open a database file directly
    ///
    /// # Errors
    ///
    /// `Connection` if the file is missing or not a database.
    pub fn open_path(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| connection_error(&label, e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }
}

impl SqlSource for SqliteSource {
    fn describe(&self) -> String {
        format!("{}{}", SCHEME, self.path.display())
    }

    fn run_query(&mut self, query: &str) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(query).map_err(query_error)?;

        let columns: Vec<ColumnSpec> = stmt
            .columns()
            .iter()
            .map(|c| match c.decl_type() {
                Some(t) => ColumnSpec::typed(c.name(), t),
                None => ColumnSpec::named(c.name()),
            })
            .collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(query_error)?;
        while let Some(row) = cursor.next().map_err(query_error)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value = match row.get_ref(i).map_err(query_error)? {
                    ValueRef::Null => SqlValue::Null,
                    ValueRef::Integer(n) => SqlValue::Integer(n),
                    ValueRef::Real(f) => SqlValue::Real(f),
                    ValueRef::Text(t) => match std::str::from_utf8(t) {
                        Ok(text) => SqlValue::Text(text.to_string()),
                        Err(_) => return Err(non_utf8_cell(&columns[i].name, rows.len() + 1)),
                    },
                    ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
                };
                values.push(value);
            }
            rows.push(values);
        }

        tracing::debug!(source = %self.describe(), rows = rows.len(), "sql query executed");
        Ok(ResultSet { columns, rows })
    }
}
