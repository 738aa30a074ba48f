//! Candidate discovery
//!
//! Scans a directory (non-recursively) for database files worth backing up.
//! Candidates are identified fresh each cycle; nothing is cached.

use std::fs;
use std::path::Path;

use crate::error::{BackupError, BackupResult};

/// Name suffixes that mark a file as a backup candidate
pub const DB_SUFFIXES: [&str; 2] = [".sql", ".sqlite3"];

/// List candidate filenames directly inside `dir`
///
/// Returns names in the order the directory listing yields them. Candidates
/// are matched by name only; contents are never opened, so a zero-byte or
/// unreadable entry still qualifies (it will surface as a per-file failure
/// at copy time).
pub fn find_candidates(dir: &Path) -> BackupResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        BackupError::Io(format!(
            "Failed to read scan directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| BackupError::Io(format!("Failed to read directory entry: {}", e)))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if DB_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            candidates.push(name);
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_matches_database_suffixes_only() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.sql")).unwrap();
        File::create(temp_dir.path().join("b.sqlite3")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join("sql")).unwrap();

        let mut candidates = find_candidates(temp_dir.path()).unwrap();
        candidates.sort();
        assert_eq!(candidates, vec!["a.sql", "b.sqlite3"]);
    }

    #[test]
    fn test_empty_directory_yields_no_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = find_candidates(temp_dir.path()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        File::create(nested.join("deep.sql")).unwrap();

        let candidates = find_candidates(temp_dir.path()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_zero_byte_file_still_qualifies() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("empty.sql")).unwrap();

        let candidates = find_candidates(temp_dir.path()).unwrap();
        assert_eq!(candidates, vec!["empty.sql"]);
    }

    #[test]
    fn test_missing_scan_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");
        let err = find_candidates(&missing).unwrap_err();
        assert!(err.is_io());
    }
}
