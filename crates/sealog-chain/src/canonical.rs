//! Canonical encoding of a record's hashable fields.
//!
//! The recorder and the verifier must agree byte-for-byte on what was
//! hashed; any drift between them is indistinguishable from tampering.
//! This module is therefore the ONLY place the hashable encoding exists —
//! both sides call `canonical_bytes`, never a local reimplementation.
//!
//! Encoding rules:
//!   - exactly the fields `{event_type, payload, session_id, ts}`, in that
//!     key order (serde struct-field order), regardless of caller input
//!   - compact JSON: no whitespace, serde_json's single string-escaping and
//!     number-formatting rules
//!   - payload object keys in sorted order at every nesting level
//!     (serde_json's default `Map` is `BTreeMap`-backed; the
//!     `preserve_order` feature must never be enabled in this workspace)

use serde::Serialize;
use serde_json::{Map, Value};

use sealog_contracts::Timestamp;

/// The hashable subset of an audit record, in fixed key order.
#[derive(Serialize)]
struct HashableFields<'a> {
    event_type: &'a str,
    payload: &'a Map<String, Value>,
    session_id: Option<i64>,
    ts: &'a Timestamp,
}

/// Encode the hashable fields as a deterministic byte string.
///
/// Two semantically equal records always produce identical bytes.
///
/// # Panics
///
/// Panics if serialization fails — which cannot happen: every field is a
/// JSON-native type and all map keys are strings.
pub fn canonical_bytes(
    event_type: &str,
    payload: &Map<String, Value>,
    session_id: Option<i64>,
    ts: &Timestamp,
) -> Vec<u8> {
    serde_json::to_vec(&HashableFields {
        event_type,
        payload,
        session_id,
        ts,
    })
    .expect("hashable fields must always serialize to JSON")
}
