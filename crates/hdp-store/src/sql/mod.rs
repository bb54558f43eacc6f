//! Relational sources for SQL snapshots
//!
//! Connection strings are dispatched by scheme. Only SQLite has a driver in
//! this build; other engines are reported as not implemented.

pub mod sqlite;

pub use sqlite::SqliteSource;

use crate::errors::Result;
use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::snapshot::SqlSource;

/// Open a source for `connection`
///
/// # Errors
///
/// - `Connection` when the SQLite database cannot be opened
/// - `NotImplemented` for recognised engines without a driver
/// - `InvalidInput` for anything that is not a connection string
pub fn open_source(connection: &str) -> Result<Box<dyn SqlSource>> {
    let scheme = connection.split_once("://").map(|(s, _)| s.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("sqlite") => Ok(Box::new(SqliteSource::open(connection)?)),
        Some(engine @ ("postgres" | "postgresql" | "mysql" | "mariadb" | "mssql")) => {
            Err(ExError::new(ExErrorKind::NotImplemented)
                .with_op("open_sql_source")
                .with_message(format!("no driver for '{}' in this build", engine)))
        }
        _ => Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("open_sql_source")
            .with_message("connection string must look like 'sqlite://path/to/db'")),
    }
}
