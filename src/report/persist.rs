//! Report persistence

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use super::{render_text, Report};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create report directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write the text report to `path`, replacing any previous report
pub fn write_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    write_atomic(path, render_text(report).as_bytes())
}

/// Write the JSON form of the report to `path`
pub fn write_json_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut content = serde_json::to_string_pretty(report)?;
    content.push('\n');
    write_atomic(path, content.as_bytes())
}

/// Replace `path` with `content` in one step
///
/// An exclusive lock on `<path>.lock` serializes concurrent writers; the
/// content goes to `<path>.tmp` and is renamed over the target, so readers
/// see either the old file or the complete new one. The lock file is removed
/// again before the lock is released.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Separate lock file so the rename does not drop the lock
    let lock_path = with_suffix(path, ".lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .map_err(|source| ReportError::Lock {
            path: lock_path.clone(),
            source,
        })?;
    lock_file.lock_exclusive().map_err(|source| ReportError::Lock {
        path: lock_path.clone(),
        source,
    })?;

    let result = replace(path, content);

    if let Err(e) = std::fs::remove_file(&lock_path) {
        debug!(path = %lock_path.display(), "Could not remove lock file: {}", e);
    }
    drop(lock_file);
    result
}

fn replace(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    let temp_path = with_suffix(path, ".tmp");
    let written = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .and_then(|mut temp_file| {
            temp_file.write_all(content)?;
            temp_file.sync_all()
        })
        .and_then(|()| std::fs::rename(&temp_path, path));

    if let Err(source) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(ReportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!(path = %path.display(), bytes = content.len(), "Report written");
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::config::FailPolicy;
    use crate::Finding;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn report(messages: &[&str]) -> Report {
        let mut agg = Aggregator::new();
        for msg in messages {
            agg.add(Finding::new("solhint", "Foo", msg));
        }
        Report::build(
            agg.finish(),
            1,
            DateTime::from_timestamp(0, 0).unwrap(),
            &FailPolicy::default(),
        )
    }

    #[test]
    fn test_write_overwrites_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("security-report.txt");

        write_report(&report(&["first", "second"]), &path).unwrap();
        write_report(&report(&["third"]), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("third"));
        assert!(!text.contains("first"));
        assert_eq!(text.matches(super::super::REPORT_TITLE).count(), 1);
        assert!(!dir.path().join("security-report.txt.tmp").exists());
        assert!(!dir.path().join("security-report.txt.lock").exists());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/report.json");
        write_json_report(&report(&["first"]), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["artifact_count"], 1);
        assert_eq!(value["findings"][0]["message"], "first");
        assert_eq!(value["counts_by_severity"]["informational"], 1);
        assert_eq!(value["passed"], true);
    }

    #[test]
    fn test_unwritable_target_is_an_error() {
        let dir = TempDir::new().unwrap();
        // a directory where the report file should be
        let path = dir.path().join("report.txt");
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let err = write_report(&report(&["x"]), &path).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!dir.path().join("report.txt.lock").exists());
        assert!(!dir.path().join("report.txt.tmp").exists());
    }
}
