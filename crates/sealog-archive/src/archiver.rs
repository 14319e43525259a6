//! Immutable archival of closed segments.
//!
//! `archive` copies — never moves — a closed segment to a date-partitioned
//! key in the remote store, so local verification stays possible whether
//! or not the remote is reachable.  `check_presence` is a deliberate weak
//! guarantee: it confirms that *some* object exists for a date partition
//! and nothing about its content.  Archival durability and chain
//! integrity are independent: no failure here may affect append or verify
//! correctness.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use sealog_contracts::{date_key_prefix, ArchivePointer, LogSegment, SealogResult};

use crate::storage::StorageClient;

/// Copies closed segments into a write-once remote store and answers
/// presence queries against it.
///
/// Stateless across invocations: every call is idempotent from this side
/// (re-archiving an already-archived segment is the remote store's
/// write-once policy to accept or reject).
pub struct Archiver {
    client: Box<dyn StorageClient>,
    bucket: String,
    prefix: String,
}

impl Archiver {
    pub fn new(
        client: Box<dyn StorageClient>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Copy `segment` to `{prefix}/{year}/{month}/{day}/{file_name}`.
    ///
    /// The local file is retained.
    pub fn archive(&self, segment: &LogSegment) -> SealogResult<ArchivePointer> {
        let key = format!(
            "{}/{}",
            date_key_prefix(&self.prefix, segment.date),
            segment.file_name()
        );

        self.client.copy(&segment.path, &self.bucket, &key)?;

        info!(
            segment = %segment.path.display(),
            bucket = %self.bucket,
            key = %key,
            "segment archived"
        );

        Ok(ArchivePointer {
            bucket: self.bucket.clone(),
            key,
            date: segment.date,
        })
    }

    /// Whether at least one object exists under `date`'s key partition.
    ///
    /// Presence only — remote content is never fetched or re-hashed.  An
    /// unreachable store propagates as `StorageUnavailable`, never as
    /// `Ok(false)`.
    pub fn check_presence(&self, date: NaiveDate) -> SealogResult<bool> {
        let partition = date_key_prefix(&self.prefix, date);
        let objects = self.client.list(&self.bucket, &partition)?;
        Ok(!objects.is_empty())
    }
}

/// Discover closed segments under `dir`: files named `audit-YYYY-MM-DD.log`
/// dated strictly before `today`, oldest first.
///
/// Today's segment is excluded because it is still open for appends.  A
/// missing directory means nothing has been recorded yet.
pub fn closed_segments(dir: &Path, today: NaiveDate) -> SealogResult<Vec<LogSegment>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut segments = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(date) = segment_date(&name.to_string_lossy()) else {
            continue;
        };
        if date < today {
            segments.push(LogSegment {
                path: entry.path(),
                date,
            });
        }
    }

    segments.sort_by_key(|s| s.date);
    Ok(segments)
}

/// Parse the date out of a segment file name, if it is one.
fn segment_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_prefix("audit-")?.strip_suffix(".log")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
