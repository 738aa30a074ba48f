//! Archiver for dbbackup
//!
//! Copies candidate files into the backup directory under timestamped names,
//! preserving file metadata, and classifies each attempt as a success or a
//! failure. One failing file never aborts the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use filetime::FileTime;

use crate::error::{BackupError, BackupResult};

/// One successfully archived candidate
#[derive(Debug, Clone)]
pub struct ArchiveSuccess {
    /// Original filename in the scan directory
    pub filename: String,
    /// Full path of the stored copy
    pub destination: PathBuf,
}

/// One candidate that could not be archived
#[derive(Debug)]
pub struct ArchiveFailure {
    /// Original filename in the scan directory
    pub filename: String,
    /// What went wrong
    pub error: BackupError,
}

/// Copies candidates into the backup directory
pub struct Archiver {
    backup_dir: PathBuf,
}

impl Archiver {
    /// Create a new Archiver targeting `backup_dir`
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    /// Archive `candidates` from `scan_dir`, stamped with `timestamp`
    ///
    /// The backup directory is created first (already existing is fine);
    /// failure to create it is a cycle-level error since nothing could be
    /// copied. Every candidate then lands in exactly one of the two returned
    /// sequences, in input order.
    pub fn archive(
        &self,
        scan_dir: &Path,
        candidates: &[String],
        timestamp: DateTime<Local>,
    ) -> BackupResult<(Vec<ArchiveSuccess>, Vec<ArchiveFailure>)> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            BackupError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let stamp = timestamp.format("%Y%m%d_%H%M%S").to_string();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for name in candidates {
            let source = scan_dir.join(name);
            let destination = self.resolve_destination(name, &stamp);
            match copy_preserving(&source, &destination) {
                Ok(()) => {
                    println!("Backed up {} -> {}", name, destination.display());
                    successes.push(ArchiveSuccess {
                        filename: name.clone(),
                        destination,
                    });
                }
                Err(error) => {
                    eprintln!("Failed to back up {}: {}", name, error);
                    failures.push(ArchiveFailure {
                        filename: name.clone(),
                        error,
                    });
                }
            }
        }

        Ok((successes, failures))
    }

    /// Pick a free destination path for `name` at `stamp`
    ///
    /// Names follow `{name}_{YYYYMMDD_HHMMSS}`. If that path is already
    /// taken (a second run within the same second), a numeric suffix is
    /// appended until an unused name is found.
    fn resolve_destination(&self, name: &str, stamp: &str) -> PathBuf {
        let base = self.backup_dir.join(format!("{}_{}", name, stamp));
        if !base.exists() {
            return base;
        }

        let mut counter = 2u32;
        loop {
            let candidate = self
                .backup_dir
                .join(format!("{}_{}.{}", name, stamp, counter));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Get the backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }
}

/// Copy `source` to `destination`, carrying over permission bits and mtime
///
/// `fs::copy` already transfers permission bits; the modification time has
/// to be set explicitly afterwards.
fn copy_preserving(source: &Path, destination: &Path) -> BackupResult<()> {
    let metadata = fs::metadata(source)
        .map_err(|e| BackupError::Io(format!("Failed to read source metadata: {}", e)))?;

    fs::copy(source, destination)
        .map_err(|e| BackupError::Io(format!("Copy failed: {}", e)))?;

    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(destination, mtime).map_err(|e| {
        BackupError::Io(format!("Failed to preserve modification time: {}", e))
    })?;

    Ok(())
}
