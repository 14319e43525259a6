//! Hash-chain primitives: record digests.
//!
//! Hash input layout (bytes, in order):
//!   1. prev_hash as UTF-8 bytes (64 ASCII hex chars, or empty for the
//!      first record in a segment)
//!   2. canonical encoding of the record's hashable fields
//!      (see `canonical::canonical_bytes`)

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use sealog_contracts::{AuditRecord, Timestamp};

use crate::canonical::canonical_bytes;

/// Compute the SHA-256 hash for one record from its constituent fields.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_record(
    prev_hash: &str,
    event_type: &str,
    payload: &Map<String, Value>,
    session_id: Option<i64>,
    ts: &Timestamp,
) -> String {
    let canonical = canonical_bytes(event_type, payload, session_id, ts);

    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(&canonical);

    hex::encode(hasher.finalize())
}

/// Recompute the digest a stored record claims in its `hash` field.
///
/// Uses the record's own `prev_hash`, so linkage must be checked
/// separately — a record can be self-consistent yet point at the wrong
/// predecessor.
pub fn recompute_hash(record: &AuditRecord) -> String {
    hash_record(
        &record.prev_hash,
        &record.event_type,
        &record.payload,
        record.session_id,
        &record.ts,
    )
}
