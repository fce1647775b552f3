//! Timestamped backups of the storage file
//!
//! Before the storage document is rewritten, the current file is copied
//! to `<name>.<timestamp>.bak` next to it. The timestamp is local time
//! at millisecond precision, so backups sort lexically the same way
//! they sort chronologically and a rerun within one second still gets
//! a distinct name.
//!
//! v0.2.0: millisecond timestamps, older second-precision backups are
//! simply ignored by the listing.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ResetError;

/// File extension appended after the timestamp
pub const BACKUP_SUFFIX: &str = "bak";

/// `YYYYMMDDHHmmssfff`, 17 digits, local time
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
const TIMESTAMP_LEN: usize = 17;

/// One backup file sitting next to the storage file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Full file name, e.g. `storage.json.20260824153012345.bak`
    pub file_name: String,
    pub path: PathBuf,
    /// Creation time as parsed back out of the file name
    pub created: NaiveDateTime,
}

/// Copy `source` to a fresh timestamped sibling
///
/// The source is read exactly as it is on disk; no parsing happens, so
/// even a corrupt storage file is preserved byte for byte.
pub fn snapshot(source: &Path) -> Result<BackupRecord, ResetError> {
    if !source.exists() {
        return Err(ResetError::SourceMissing(source.to_path_buf()));
    }

    let base = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ResetError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("backup source has no usable file name: {}", source.display()),
            ))
        })?;

    let now = Local::now().naive_local();
    let stamp = now.format(TIMESTAMP_FORMAT).to_string();
    let file_name = format!("{}.{}.{}", base, stamp, BACKUP_SUFFIX);
    let path = source.with_file_name(&file_name);

    fs::copy(source, &path)?;
    debug!("backup written: {}", path.display());

    // The record's timestamp is what the file name says, which drops
    // sub-millisecond precision from `now`.
    let created = parse_stamp(&stamp).unwrap_or(now);

    Ok(BackupRecord {
        file_name,
        path,
        created,
    })
}

/// Enumerate backups of `source` in its parent directory
///
/// Only names of the exact form `<source-name>.<17 digits>.bak` where
/// the digits parse as a real local timestamp are included; everything
/// else in the directory is someone else's business. Sorted newest
/// first, ties broken by file name.
pub fn list_backups(source: &Path) -> io::Result<Vec<BackupRecord>> {
    let dir = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(Vec::new()),
    };
    let base = match source.file_name().and_then(|name| name.to_str()) {
        Some(base) => base,
        None => return Ok(Vec::new()),
    };

    let prefix = format!("{}.", base);
    let suffix = format!(".{}", BACKUP_SUFFIX);

    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name_os = entry.file_name();
        let name = match name_os.to_str() {
            Some(name) => name,
            None => continue,
        };
        let middle = match name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
        {
            Some(middle) => middle,
            None => continue,
        };
        let created = match parse_stamp(middle) {
            Some(created) => created,
            None => continue,
        };
        records.push(BackupRecord {
            file_name: name.to_string(),
            path: entry.path(),
            created,
        });
    }

    records.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    Ok(records)
}

fn parse_stamp(stamp: &str) -> Option<NaiveDateTime> {
    if stamp.len() != TIMESTAMP_LEN || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_snapshot_of_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("storage.json");
        let err = snapshot(&source).unwrap_err();
        assert!(matches!(err, ResetError::SourceMissing(p) if p == source));
    }

    #[test]
    fn test_snapshot_copies_bytes_and_keeps_original() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{\"k\": \"v\"}");

        let record = snapshot(&source).unwrap();

        assert!(source.exists());
        assert_eq!(
            fs::read(&record.path).unwrap(),
            fs::read(&source).unwrap()
        );
        assert!(record.file_name.starts_with("storage.json."));
        assert!(record.file_name.ends_with(".bak"));

        let middle = record
            .file_name
            .trim_start_matches("storage.json.")
            .trim_end_matches(".bak");
        assert_eq!(middle.len(), 17);
        assert!(middle.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_snapshot_record_timestamp_matches_file_name() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");

        let record = snapshot(&source).unwrap();
        let middle = record
            .file_name
            .trim_start_matches("storage.json.")
            .trim_end_matches(".bak");
        assert_eq!(parse_stamp(middle), Some(record.created));
    }

    #[test]
    fn test_list_backups_orders_newest_first() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");
        write_file(&dir, "storage.json.20240102030405111.bak", "a");
        write_file(&dir, "storage.json.20250601120000000.bak", "b");
        write_file(&dir, "storage.json.20231231235959999.bak", "c");

        let records = list_backups(&source).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "storage.json.20250601120000000.bak",
                "storage.json.20240102030405111.bak",
                "storage.json.20231231235959999.bak",
            ]
        );
    }

    #[test]
    fn test_list_backups_skips_foreign_files() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");
        write_file(&dir, "storage.json.20240102030405111.bak", "real");
        // wrong base name
        write_file(&dir, "other.json.20240102030405111.bak", "x");
        // timestamp not parseable
        write_file(&dir, "storage.json.notastamp.bak", "x");
        // too few digits (old second-precision format)
        write_file(&dir, "storage.json.20240102030405.bak", "x");
        // impossible date
        write_file(&dir, "storage.json.20241399999999999.bak", "x");
        // trailing junk after suffix
        write_file(&dir, "storage.json.20240102030405111.bak.tmp", "x");

        let records = list_backups(&source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "storage.json.20240102030405111.bak");
    }

    #[test]
    fn test_list_backups_skips_directories() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");
        write_file(&dir, "storage.json.20240102030405111.bak", "real");
        // a directory wearing a backup name is not a backup
        fs::create_dir(dir.path().join("storage.json.20240102030405222.bak")).unwrap();

        let records = list_backups(&source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "storage.json.20240102030405111.bak");
    }

    #[test]
    fn test_list_backups_empty_directory() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");
        assert!(list_backups(&source).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_snapshots_get_distinct_names() {
        let dir = TempDir::new().unwrap();
        let source = write_file(&dir, "storage.json", "{}");

        let first = snapshot(&source).unwrap();
        let second = snapshot(&source).unwrap();
        // Millisecond precision plus the time two copies take makes a
        // collision effectively impossible; if this ever flakes the
        // format lost precision.
        assert_ne!(first.file_name, second.file_name);
        assert_eq!(list_backups(&source).unwrap().len(), 2);
    }
}
