//! # sealog-verify
//!
//! Chain integrity verification for sealog segments.
//!
//! Replays a segment from its first line, recomputing every record's
//! SHA-256 digest with the same canonical encoding the recorder used, and
//! reports the first point of divergence as a typed error carrying the
//! 1-based line number.  Success returns the count of validated records.
//!
//! Verification is read-only, deterministic, and idempotent; any number of
//! concurrent verifications may run against committed bytes.

pub mod verifier;

pub use verifier::{verify_reader, verify_segment};

// ── Tests ─────────────────────────────────────────────────────────────────────
