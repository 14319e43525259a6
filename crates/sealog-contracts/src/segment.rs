//! Log segment and archive pointer types.
//!
//! A `LogSegment` is one UTC day of audit records in a single local file.
//! Exactly one recorder instance may hold the open segment; once the date
//! rolls over the file is closed and never written again.  An
//! `ArchivePointer` names the remote, write-once copy of a closed segment.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// A dated, newline-delimited audit log file on local disk.
///
/// Lifecycle: open (actively appended) → closed at rotation → archived
/// (copied, never moved) → retained locally.  The segment is the unit of
/// chain integrity: its first record links to `AuditRecord::GENESIS_PREV`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSegment {
    /// Full path of the segment file.
    pub path: PathBuf,
    /// The UTC day this segment covers.
    pub date: NaiveDate,
}

impl LogSegment {
    /// The segment path for `date` under `dir`: `audit-YYYY-MM-DD.log`.
    pub fn for_date(dir: &Path, date: NaiveDate) -> Self {
        let path = dir.join(format!("audit-{}.log", date.format("%Y-%m-%d")));
        Self { path, date }
    }

    /// The file name component, e.g. `audit-2026-08-28.log`.
    ///
    /// Infallible: `for_date` always produces a path with a final component.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The remote location of an archived segment.
///
/// Write-once semantics are enforced by the remote store, not here; this
/// type is only ever created by the archiver and read by presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePointer {
    /// Remote bucket name.
    pub bucket: String,
    /// Full object key, `{prefix}/{year}/{month}/{day}/{file_name}`.
    pub key: String,
    /// The partition date the key encodes.
    pub date: NaiveDate,
}

/// The date-partitioned key prefix for `date`:
/// `{prefix}/{year:04}/{month:02}/{day:02}`.
///
/// Shared by `archive` (which appends the file name) and `check_presence`
/// (which lists under it), so the two can never disagree on the layout.
pub fn date_key_prefix(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}",
        prefix,
        date.year(),
        date.month(),
        date.day()
    )
}
