//! Chain verification: a single forward pass over a segment.
//!
//! The verifier is a pure function over a byte stream.  It never writes,
//! holds no state across invocations, and knows nothing about exit codes —
//! the CLI boundary maps error kinds to process exits.
//!
//! Fail-fast by design: the scan stops at the first divergence.  Any claim
//! about records after a break would be unfounded, so there is no
//! resynchronize-and-continue mode.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use sealog_chain::recompute_hash;
use sealog_contracts::{AuditRecord, SealogError, SealogResult};

/// Verify a chain read line-by-line from `reader`.
///
/// For each non-empty line, in order:
/// 1. parse as an `AuditRecord` — failure is `MalformedRecord`;
/// 2. check `prev_hash` against the previous record's `hash` (the empty
///    string at genesis) — mismatch is `ChainBroken`;
/// 3. recompute the digest from the record's own fields — mismatch is
///    `HashMismatch`.
///
/// Blank lines are skipped without affecting chain state but still count
/// toward the reported 1-based line numbers.  Returns the number of
/// validated records.
///
/// Lines are read as raw bytes: the log format is UTF-8 text, so a line
/// that is not valid UTF-8 is an unparsable line — `MalformedRecord` with
/// its line number, not a bare I/O error.
pub fn verify_reader(reader: impl BufRead) -> SealogResult<usize> {
    let mut expected_prev = AuditRecord::GENESIS_PREV.to_string();
    let mut validated = 0usize;

    for (index, chunk) in reader.split(b'\n').enumerate() {
        let line_number = index + 1;
        let bytes = chunk?;

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }

        let line = std::str::from_utf8(&bytes).map_err(|e| SealogError::MalformedRecord {
            line: line_number,
            reason: format!("invalid UTF-8: {}", e),
        })?;

        let record: AuditRecord =
            serde_json::from_str(line).map_err(|e| SealogError::MalformedRecord {
                line: line_number,
                reason: e.to_string(),
            })?;

        if record.prev_hash != expected_prev {
            return Err(SealogError::ChainBroken {
                line: line_number,
                expected: expected_prev,
                found: record.prev_hash,
            });
        }

        if recompute_hash(&record) != record.hash {
            return Err(SealogError::HashMismatch { line: line_number });
        }

        expected_prev = record.hash;
        validated += 1;
    }

    debug!(records = validated, "chain verified");
    Ok(validated)
}

/// Verify the segment file at `path`.
///
/// A missing file is `LogMissing`, which the CLI reports distinctly from
/// an integrity failure.  Only verify closed segments, or live segments
/// written by a recorder that flushes each full line before returning —
/// verifying a file that is being truncated or rewritten is undefined.
pub fn verify_segment(path: &Path) -> SealogResult<usize> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SealogError::LogMissing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    verify_reader(BufReader::new(file))
}
