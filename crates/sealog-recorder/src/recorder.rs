//! File-backed chain recorder.
//!
//! `ChainRecorder` owns the open segment: its file handle and the tail
//! hash of the chain.  Appends are serialized by an internal `Mutex`;
//! cross-process exclusion is a deployment discipline (one writer process
//! per log directory), not enforced here.
//!
//! Durability: each record is written as one line in a single `write_all`
//! on an append-mode handle, then flushed and `sync_data`ed before
//! `append` returns.  A concurrent reader sees the line fully or not at
//! all, never a partial prefix.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::{debug, info};

use sealog_chain::{hash_record, recompute_hash};
use sealog_contracts::{
    AuditRecord, Clock, LogSegment, SealogError, SealogResult, SystemClock, Timestamp,
};

// ── Open segment state ────────────────────────────────────────────────────────

/// The mutable interior of a `ChainRecorder`: the open segment and the
/// `hash` of its last record.
struct OpenSegment {
    segment: LogSegment,
    file: File,
    tail_hash: String,
}

impl OpenSegment {
    /// Open (or create) the segment for `date` under `dir`, recovering the
    /// tail hash from the last non-empty line.
    fn open(dir: &Path, date: chrono::NaiveDate) -> SealogResult<Self> {
        fs::create_dir_all(dir)?;

        let segment = LogSegment::for_date(dir, date);
        let tail_hash = recover_tail(&segment.path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&segment.path)?;

        info!(
            segment = %segment.path.display(),
            tail = %tail_hash,
            "audit segment opened"
        );

        Ok(Self {
            segment,
            file,
            tail_hash,
        })
    }
}

/// Read the tail hash of the segment at `path`.
///
/// Missing or empty files start a fresh chain (`prev_hash = ""`).  A tail
/// record that fails to parse, or whose stored hash does not match the
/// recomputed digest, makes the chain state unrecoverable: appending on top
/// of it would silently corrupt the chain, so the recorder refuses with
/// `ChainStateUnavailable` instead of guessing.
fn recover_tail(path: &Path) -> SealogResult<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(e.into()),
    };

    // Stream the segment one line at a time, keeping only the last
    // non-empty line.  A day's segment can be large; it is never held in
    // memory whole.
    let mut last_line: Option<Vec<u8>> = None;
    for chunk in BufReader::new(file).split(b'\n') {
        let bytes = chunk?;
        if !bytes.iter().all(|b| b.is_ascii_whitespace()) {
            last_line = Some(bytes);
        }
    }

    let Some(bytes) = last_line else {
        return Ok(String::new());
    };

    let record: AuditRecord =
        serde_json::from_slice(&bytes).map_err(|e| SealogError::ChainStateUnavailable {
            reason: format!("cannot parse tail record of {}: {}", path.display(), e),
        })?;

    if recompute_hash(&record) != record.hash {
        return Err(SealogError::ChainStateUnavailable {
            reason: format!(
                "tail record of {} fails its own digest; segment requires manual recovery",
                path.display()
            ),
        });
    }

    Ok(record.hash)
}

// ── Public recorder ───────────────────────────────────────────────────────────

/// The single writer of the open audit segment.
///
/// On construction the recorder recovers the tail hash of today's segment
/// (an absent or empty segment starts at `AuditRecord::GENESIS_PREV`).
/// When the clock's UTC date passes the open segment's date, the next
/// `append` closes the old file and starts a fresh segment — and a fresh
/// chain.
pub struct ChainRecorder {
    dir: PathBuf,
    clock: Box<dyn Clock>,
    state: Mutex<OpenSegment>,
}

impl ChainRecorder {
    /// Open a recorder over `dir` using the system clock.
    pub fn open(dir: impl Into<PathBuf>) -> SealogResult<Self> {
        Self::with_clock(dir, Box::new(SystemClock))
    }

    /// Open a recorder with an injected clock.  Rotation tests drive this
    /// with a manual clock.
    pub fn with_clock(dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> SealogResult<Self> {
        let dir = dir.into();
        let state = OpenSegment::open(&dir, clock.today())?;
        Ok(Self {
            dir,
            clock,
            state: Mutex::new(state),
        })
    }

    /// Append one event to the chain.
    ///
    /// Computes `hash = SHA-256(prev_hash ++ canonical(fields))`, writes
    /// the full record as one durable line, advances the tail, and returns
    /// the record as written.
    ///
    /// Rejects an empty `event_type` with `InvalidEvent`.  Payload values
    /// are JSON by construction (`serde_json::Map`), so there is no
    /// coercion path for unsupported types.
    pub fn append(
        &self,
        event_type: &str,
        payload: Map<String, Value>,
        session_id: Option<i64>,
        ts: Timestamp,
    ) -> SealogResult<AuditRecord> {
        if event_type.trim().is_empty() {
            return Err(SealogError::InvalidEvent {
                reason: "event_type must be non-empty".to_string(),
            });
        }

        let mut state = self.state.lock().map_err(|e| SealogError::ChainStateUnavailable {
            reason: format!("recorder lock poisoned: {}", e),
        })?;

        // Rotate at the UTC day boundary.  Dropping the old handle closes
        // the segment; it is never written again.
        let today = self.clock.today();
        if today != state.segment.date {
            info!(
                closed = %state.segment.path.display(),
                date = %today,
                "rotating audit segment"
            );
            *state = OpenSegment::open(&self.dir, today)?;
        }

        let prev_hash = state.tail_hash.clone();
        let hash = hash_record(&prev_hash, event_type, &payload, session_id, &ts);

        let record = AuditRecord {
            event_type: event_type.to_string(),
            payload,
            session_id,
            ts,
            prev_hash,
            hash,
        };

        // One line, one write.  serde_json cannot fail on AuditRecord.
        let mut line = serde_json::to_vec(&record)
            .expect("audit record must always serialize to JSON");
        line.push(b'\n');

        state.file.write_all(&line)?;
        state.file.flush()?;
        state.file.sync_data()?;

        state.tail_hash = record.hash.clone();

        debug!(
            event_type = %record.event_type,
            hash = %record.hash,
            "audit record appended"
        );

        Ok(record)
    }

    /// The `hash` of the last appended record — a compact commitment to
    /// the open segment's entire chain.  Empty before the first append.
    pub fn tail_hash(&self) -> String {
        self.state
            .lock()
            .expect("recorder lock poisoned")
            .tail_hash
            .clone()
    }

    /// The segment currently open for appends.
    pub fn open_segment(&self) -> LogSegment {
        self.state
            .lock()
            .expect("recorder lock poisoned")
            .segment
            .clone()
    }
}
