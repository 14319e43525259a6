//! # sealog-recorder
//!
//! Append-only, rotating, hash-chained audit log recorder.
//!
//! ## Overview
//!
//! `ChainRecorder` appends application events to a local newline-delimited
//! segment file, chaining each record to the previous one by SHA-256.  On
//! startup it recovers the chain tail from the last line of today's
//! segment; at the UTC day boundary it rotates to a fresh segment (and a
//! fresh chain).  A segment whose tail cannot be recovered blocks all
//! appends — guessing a `prev_hash` would be indistinguishable from
//! tampering.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sealog_recorder::ChainRecorder;
//!
//! let recorder = ChainRecorder::open("/var/log/audit")?;
//! recorder.append("login", payload, Some(session), ts.into())?;
//! ```

pub mod recorder;

pub use recorder::ChainRecorder;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::sync::Arc;

    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::{json, Map, Value};

    use sealog_contracts::{AuditRecord, Clock, ManualClock, SealogError, Timestamp};
    use sealog_verify::verify_segment;

    use super::ChainRecorder;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn payload_of(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("test payload must be an object, got {other}"),
        }
    }

    fn manual_clock(y: i32, m: u32, d: u32) -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        ))
    }

    /// Adapter so one `Arc<ManualClock>` can drive the recorder while the
    /// test keeps a handle to move time forward.
    struct SharedClock(Arc<ManualClock>);

    impl Clock for SharedClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            self.0.now()
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// Anything appended via the recorder verifies, with the exact count.
    #[test]
    fn round_trip_append_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ChainRecorder::open(dir.path()).unwrap();

        for (i, kind) in ["login", "ack", "logout"].iter().enumerate() {
            recorder
                .append(
                    kind,
                    payload_of(json!({"step": i})),
                    Some(1),
                    Timestamp::from(format!("T{i}")),
                )
                .unwrap();
        }

        let segment = recorder.open_segment();
        assert_eq!(verify_segment(&segment.path).unwrap(), 3);
    }

    /// The first record of a fresh segment links to the empty genesis hash.
    #[test]
    fn first_record_links_to_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ChainRecorder::open(dir.path()).unwrap();

        let record = recorder
            .append("login", payload_of(json!({})), Some(1), "T1".into())
            .unwrap();

        assert_eq!(record.prev_hash, AuditRecord::GENESIS_PREV);
        assert_eq!(recorder.tail_hash(), record.hash);
    }

    /// Reopening a segment recovers the tail and keeps the chain unbroken.
    #[test]
    fn tail_recovered_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let first_tail = {
            let recorder = ChainRecorder::open(dir.path()).unwrap();
            recorder
                .append("a", payload_of(json!({})), None, "T1".into())
                .unwrap();
            recorder
                .append("b", payload_of(json!({})), None, "T2".into())
                .unwrap();
            recorder.tail_hash()
        };

        let recorder = ChainRecorder::open(dir.path()).unwrap();
        assert_eq!(recorder.tail_hash(), first_tail);

        let third = recorder
            .append("c", payload_of(json!({})), None, "T3".into())
            .unwrap();
        assert_eq!(third.prev_hash, first_tail);

        let segment = recorder.open_segment();
        assert_eq!(verify_segment(&segment.path).unwrap(), 3);
    }

    /// The tail is still found when the segment's last line has no
    /// trailing newline.
    #[test]
    fn tail_recovered_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();

        let (path, tail) = {
            let recorder = ChainRecorder::open(dir.path()).unwrap();
            recorder
                .append("a", payload_of(json!({})), None, "T1".into())
                .unwrap();
            recorder
                .append("b", payload_of(json!({})), None, "T2".into())
                .unwrap();
            (recorder.open_segment().path, recorder.tail_hash())
        };

        // Strip the final newline, as a truncated flush would leave it.
        let contents = fs::read_to_string(&path).unwrap();
        fs::write(&path, contents.trim_end_matches('\n')).unwrap();

        let recorder = ChainRecorder::open(dir.path()).unwrap();
        assert_eq!(recorder.tail_hash(), tail);
    }

    /// A corrupt tail blocks the recorder instead of forking the chain.
    #[test]
    fn corrupt_tail_refuses_to_open() {
        let dir = tempfile::tempdir().unwrap();

        {
            let recorder = ChainRecorder::open(dir.path()).unwrap();
            recorder
                .append("a", payload_of(json!({})), None, "T1".into())
                .unwrap();
        }

        // Damage the last line in place.
        let path = {
            let recorder = ChainRecorder::open(dir.path()).unwrap();
            recorder.open_segment().path
        };
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        match ChainRecorder::open(dir.path()).map(|_| ()) {
            Err(SealogError::ChainStateUnavailable { .. }) => {}
            other => panic!("expected ChainStateUnavailable, got {other:?}"),
        }
    }

    /// A tail record whose stored hash fails its own digest is also fatal.
    #[test]
    fn tampered_tail_refuses_to_open() {
        let dir = tempfile::tempdir().unwrap();

        let path = {
            let recorder = ChainRecorder::open(dir.path()).unwrap();
            recorder
                .append("a", payload_of(json!({"x": 1})), None, "T1".into())
                .unwrap();
            recorder.open_segment().path
        };

        let tampered = fs::read_to_string(&path).unwrap().replace("\"x\":1", "\"x\":2");
        fs::write(&path, tampered).unwrap();

        match ChainRecorder::open(dir.path()).map(|_| ()) {
            Err(SealogError::ChainStateUnavailable { .. }) => {}
            other => panic!("expected ChainStateUnavailable, got {other:?}"),
        }
    }

    /// Empty event types are rejected, not logged.
    #[test]
    fn empty_event_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ChainRecorder::open(dir.path()).unwrap();

        match recorder.append("  ", payload_of(json!({})), None, "T1".into()) {
            Err(SealogError::InvalidEvent { .. }) => {}
            other => panic!("expected InvalidEvent, got {other:?}"),
        }
    }

    /// Crossing the UTC day boundary closes the segment and restarts the
    /// chain in a new file.
    #[test]
    fn rotation_at_day_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let clock = manual_clock(2026, 8, 27);

        let recorder =
            ChainRecorder::with_clock(dir.path(), Box::new(SharedClock(clock.clone()))).unwrap();

        recorder
            .append("a", payload_of(json!({})), None, "T1".into())
            .unwrap();
        recorder
            .append("b", payload_of(json!({})), None, "T2".into())
            .unwrap();
        let day_one = recorder.open_segment();

        clock.set(Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 1).unwrap());
        let first_of_day_two = recorder
            .append("c", payload_of(json!({})), None, "T3".into())
            .unwrap();
        let day_two = recorder.open_segment();

        assert_ne!(day_one.path, day_two.path);
        assert_eq!(first_of_day_two.prev_hash, AuditRecord::GENESIS_PREV);

        // Both segments verify independently.
        assert_eq!(verify_segment(&day_one.path).unwrap(), 2);
        assert_eq!(verify_segment(&day_two.path).unwrap(), 1);
    }
}
