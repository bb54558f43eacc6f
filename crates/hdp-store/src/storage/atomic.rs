//! Atomic write primitives
//!
//! Uses temp→rename so a reader never observes a partial snapshot. The temp
//! file is removed on every failure path.

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Removes the temp file on drop unless the write was committed
struct TempGuard {
    path: PathBuf,
    committed: bool,
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Atomically write bytes to a file, creating parent directories as needed
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let target = target_path.display().to_string();

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_snapshot_dir", &target, e))?;
    }

    let mut guard = TempGuard {
        path: temp_path_for(target_path),
        committed: false,
    };

    {
        let mut file =
            File::create(&guard.path).map_err(|e| io_error("create_snapshot_temp", &target, e))?;
        file.write_all(content)
            .map_err(|e| io_error("write_snapshot_temp", &target, e))?;
        file.sync_all()
            .map_err(|e| io_error("sync_snapshot_temp", &target, e))?;
    }

    fs::rename(&guard.path, target_path).map_err(|e| io_error("rename_snapshot_temp", &target, e))?;
    guard.committed = true;

    Ok(())
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("v1.csv");

        atomic_write(&target, b"hello").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_write_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("snapshots").join("ds").join("v1.csv");

        atomic_write(&target, b"nested").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("v1.csv");

        atomic_write(&target, b"clean").unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_failed_write_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        // Target is an existing directory, so the final rename fails
        let target = temp_dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(atomic_write(&target, b"data").is_err());
        assert!(!temp_dir.path().join("occupied.tmp").exists());
    }
}
