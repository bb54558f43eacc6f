//! Content-addressed snapshot layout
//!
//! `<root>/snapshots/<datasetId>/<version>.csv`, with `:` in the version
//! replaced by `-` so the file name is portable.

use hdp_core::ids::{DatasetId, Version};
use std::path::{Path, PathBuf};

pub const SNAPSHOTS_DIR: &str = "snapshots";
pub const SNAPSHOT_EXTENSION: &str = "csv";

/// File stem for a version
pub fn version_stem(version: &Version) -> String {
    version
        .as_str()
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '-',
            other => other,
        })
        .collect()
}

pub fn snapshot_path(root: &Path, dataset_id: &DatasetId, version: &Version) -> PathBuf {
    root.join(SNAPSHOTS_DIR)
        .join(dataset_id.to_string())
        .join(format!("{}.{}", version_stem(version), SNAPSHOT_EXTENSION))
}
