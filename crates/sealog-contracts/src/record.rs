//! Audit record and timestamp types.
//!
//! `AuditRecord` is one line of the append-only log — an application event
//! wrapped with the SHA-256 hashes that make tampering detectable.  Field
//! declaration order here IS the wire order: serde serializes struct fields
//! in declaration order, and both the line format and the hashable prefix
//! depend on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied event timestamp: a string or a JSON number.
///
/// The subsystem never trusts `ts` for ordering (line position is the
/// ordering authority); it only carries the value through canonicalization
/// unchanged.  `serde_json::Number` is used for the numeric form so integer
/// timestamps round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::Text(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Timestamp::Text(s)
    }
}

impl From<i64> for Timestamp {
    fn from(n: i64) -> Self {
        Timestamp::Number(n.into())
    }
}

/// One entry in a segment's hash chain.
///
/// Each record commits to its predecessor via `prev_hash`, forming an
/// append-only chain per segment.  Modifying any hashable field invalidates
/// `hash` and every subsequent `prev_hash`, which the verifier detects.
///
/// The hashable fields are exactly `{event_type, payload, session_id, ts}`;
/// `prev_hash` enters the digest as a byte prefix, and `hash` is the result.
///
/// Deserialization is strict: a line carrying any key outside this schema
/// is not a record.  Extra keys sit outside the digest, so tolerating them
/// would let an in-place edit pass verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditRecord {
    /// Short tag identifying the kind of event.  Business semantics are
    /// opaque to this subsystem.
    pub event_type: String,

    /// Arbitrary event data.  `serde_json`'s default `Map` is backed by a
    /// `BTreeMap`, so keys serialize in sorted order regardless of how the
    /// caller inserted them — part of the canonicalization contract.
    pub payload: Map<String, Value>,

    /// Correlates the event to a unit of work, if any.
    pub session_id: Option<i64>,

    /// Caller-supplied occurrence time.  Not used for ordering.
    pub ts: Timestamp,

    /// Hex SHA-256 of the previous record, or `GENESIS_PREV` for the first
    /// record in a segment.
    pub prev_hash: String,

    /// Hex SHA-256 of `prev_hash ++ canonical(hashable fields)`.
    pub hash: String,
}

impl AuditRecord {
    /// The `prev_hash` of the first record in every segment: the empty
    /// string.  Each rotated segment starts a fresh chain.
    pub const GENESIS_PREV: &'static str = "";
}
