//! # sealog-archive
//!
//! Immutable archival of closed audit segments into a write-once remote
//! store, plus date-partition presence checks.
//!
//! The remote API is hidden behind [`storage::StorageClient`]; production
//! uses the `aws` CLI client, tests use the in-memory fake.  Remote
//! failures surface as `StorageUnavailable` and never bleed into local
//! append/verify correctness.

pub mod archiver;
pub mod storage;

pub use archiver::{closed_segments, Archiver};
pub use storage::{AwsCliStorage, InMemoryStorage, StorageClient};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use sealog_contracts::{LogSegment, SealogError, SealogResult};

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_segment(dir: &Path, day: NaiveDate, contents: &str) -> LogSegment {
        let segment = LogSegment::for_date(dir, day);
        fs::write(&segment.path, contents).unwrap();
        segment
    }

    /// Shares one `InMemoryStorage` between the archiver and the test's
    /// assertions.
    struct SharedStorage(Arc<InMemoryStorage>);

    impl StorageClient for SharedStorage {
        fn copy(&self, local: &Path, bucket: &str, key: &str) -> SealogResult<()> {
            self.0.copy(local, bucket, key)
        }
        fn list(&self, bucket: &str, key_prefix: &str) -> SealogResult<Vec<String>> {
            self.0.list(bucket, key_prefix)
        }
    }

    /// A storage client whose backend is down.
    struct DownStorage;

    impl StorageClient for DownStorage {
        fn copy(&self, _: &Path, _: &str, _: &str) -> SealogResult<()> {
            Err(SealogError::StorageUnavailable {
                reason: "backend down".to_string(),
            })
        }
        fn list(&self, _: &str, _: &str) -> SealogResult<Vec<String>> {
            Err(SealogError::StorageUnavailable {
                reason: "backend down".to_string(),
            })
        }
    }

    // ── Archival ──────────────────────────────────────────────────────────────

    /// Archiving copies the segment bytes verbatim under the
    /// date-partitioned key and leaves the local file in place.
    #[test]
    fn archive_copies_under_dated_key() {
        let dir = tempfile::tempdir().unwrap();
        let day = date(2026, 8, 27);
        let segment = write_segment(dir.path(), day, "line-1\nline-2\n");

        let store = Arc::new(InMemoryStorage::new());
        let archiver = Archiver::new(
            Box::new(SharedStorage(store.clone())),
            "audit-prod",
            "audit-logs",
        );

        let pointer = archiver.archive(&segment).unwrap();

        assert_eq!(pointer.bucket, "audit-prod");
        assert_eq!(pointer.key, "audit-logs/2026/08/27/audit-2026-08-27.log");
        assert_eq!(pointer.date, day);

        // Copy, not move.
        assert!(segment.path.exists());
        assert_eq!(
            store.object("audit-prod", &pointer.key).unwrap(),
            b"line-1\nline-2\n"
        );
    }

    // ── Presence ──────────────────────────────────────────────────────────────

    /// Presence is true exactly when some object exists for the partition.
    #[test]
    fn presence_tracks_partition_contents() {
        let dir = tempfile::tempdir().unwrap();
        let day = date(2026, 8, 27);
        let segment = write_segment(dir.path(), day, "x\n");

        let archiver = Archiver::new(Box::new(InMemoryStorage::new()), "b", "p");
        assert!(!archiver.check_presence(day).unwrap());

        archiver.archive(&segment).unwrap();
        assert!(archiver.check_presence(day).unwrap());

        // A neighboring day's partition stays empty.
        assert!(!archiver.check_presence(date(2026, 8, 28)).unwrap());
    }

    /// An unreachable store is an error, never a false "not present".
    #[test]
    fn presence_propagates_unavailability() {
        let archiver = Archiver::new(Box::new(DownStorage), "b", "p");
        match archiver.check_presence(date(2026, 8, 27)) {
            Err(SealogError::StorageUnavailable { .. }) => {}
            other => panic!("expected StorageUnavailable, got {other:?}"),
        }
    }

    // ── Segment discovery ─────────────────────────────────────────────────────

    /// Discovery returns only dated segment files strictly before today,
    /// oldest first, and ignores unrelated files.
    #[test]
    fn closed_segments_excludes_open_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let today = date(2026, 8, 28);

        write_segment(dir.path(), date(2026, 8, 26), "a\n");
        write_segment(dir.path(), date(2026, 8, 27), "b\n");
        write_segment(dir.path(), today, "open\n");
        fs::write(dir.path().join("notes.txt"), "not a segment").unwrap();

        let segments = closed_segments(dir.path(), today).unwrap();
        let dates: Vec<NaiveDate> = segments.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2026, 8, 26), date(2026, 8, 27)]);
    }

    /// A directory that does not exist yet has no closed segments.
    #[test]
    fn closed_segments_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        assert!(closed_segments(&missing, date(2026, 8, 28)).unwrap().is_empty());
    }
}
