//! Error types for the sealog audit subsystem.
//!
//! All fallible operations return `SealogResult<T>`.  Verification errors
//! carry the 1-based physical line number of the first divergence; the CLI
//! boundary is the only place these kinds are mapped to exit codes.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// The unified error type for the sealog crates.
#[derive(Debug, Error)]
pub enum SealogError {
    /// A log line could not be parsed as an audit record.
    ///
    /// Fatal to a verification run: nothing after this line can be trusted.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A record's `prev_hash` does not match the preceding record's `hash`.
    #[error("line {line}: chain broken: expected prev_hash {expected:?}, found {found:?}")]
    ChainBroken {
        line: usize,
        expected: String,
        found: String,
    },

    /// A record's stored `hash` does not match the recomputed digest of its
    /// own fields.
    #[error("line {line}: hash mismatch: stored hash does not match recomputed digest")]
    HashMismatch { line: usize },

    /// The recorder cannot determine the open segment's tail hash.
    ///
    /// Fatal to the recorder — appending with a guessed `prev_hash` would
    /// silently corrupt the chain, so appends are refused until the segment
    /// is manually recovered.
    #[error("chain state unavailable: {reason}")]
    ChainStateUnavailable { reason: String },

    /// Remote storage tooling or credentials are missing or unreachable.
    ///
    /// Distinct from "no objects found": an unreachable store must never be
    /// reported as a false negative.
    #[error("remote storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// No archived objects exist under the expected date partition.
    #[error("no archived objects found for {date}")]
    ArchiveAbsent { date: NaiveDate },

    /// The audit log file to verify does not exist.
    #[error("audit log not found: {}", path.display())]
    LogMissing { path: PathBuf },

    /// The caller handed the recorder an event it refuses to log.
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },

    /// A backend health/session smoke probe failed.
    #[error("smoke probe failed: {reason}")]
    ProbeFailed { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// An underlying I/O failure outside the taxonomy above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sealog crates.
pub type SealogResult<T> = Result<T, SealogError>;
