// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Shared helpers for the JSON-array files behind the knowledge store and
//! the history log.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::PersistenceError;

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// `<file>.tmp`, written before being renamed over the real file.
pub fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

/// `<file>.corrupt`, where unreadable content is preserved.
pub fn corrupt_path(path: &Path) -> PathBuf {
    sibling(path, ".corrupt")
}

/// Read a JSON array of records.
///
/// A missing or blank file is an empty record set. A file that does not
/// parse is copied to `<file>.corrupt` and also treated as empty.
pub async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PersistenceError> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice::<Vec<T>>(&raw) {
        Ok(records) => Ok(records),
        Err(parse_error) => {
            let backup = corrupt_path(path);
            let corrupt = PersistenceError::CorruptFile {
                path: path.to_path_buf(),
                reason: parse_error.to_string(),
            };
            match fs::copy(path, &backup).await {
                Ok(_) => warn!(
                    error = %corrupt,
                    backup = %backup.display(),
                    "Unreadable file preserved, starting empty"
                ),
                Err(copy_error) => warn!(
                    error = %corrupt,
                    copy_error = %copy_error,
                    "Unreadable file could not be preserved, starting empty"
                ),
            }
            Ok(Vec::new())
        }
    }
}

/// Serialize `records` as pretty JSON and atomically replace `path`.
pub async fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::io(parent, e))?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json)
        .await
        .map_err(|e| PersistenceError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| PersistenceError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_and_blank_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");

        let records: Vec<u32> = read_records(&path).await.unwrap();
        assert!(records.is_empty());

        std::fs::write(&path, "  \n").unwrap();
        let records: Vec<u32> = read_records(&path).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("memory.json");

        write_records(&path, &[1u32, 2, 3]).await.unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());
        let back: Vec<u32> = read_records(&path).await.unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{not json").unwrap();

        let records: Vec<u32> = read_records(&path).await.unwrap();
        assert!(records.is_empty());

        let backup = std::fs::read_to_string(corrupt_path(&path)).unwrap();
        assert_eq!(backup, "{not json");
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, [0xff, 0xfe, 0x5b, 0x00]).unwrap();

        let records: Vec<u32> = read_records(&path).await.unwrap();
        assert!(records.is_empty());

        let backup = std::fs::read(corrupt_path(&path)).unwrap();
        assert_eq!(backup, vec![0xff, 0xfe, 0x5b, 0x00]);
    }
}
