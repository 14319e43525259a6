//! # sealog-chain
//!
//! Canonical encoding and SHA-256 hash chaining for audit records.
//!
//! Every record's `hash` is `SHA-256(prev_hash ++ canonical(fields))`,
//! where `canonical` is the single deterministic encoding defined in
//! [`canonical`].  The recorder uses these routines to build the chain;
//! the verifier uses the same routines to check it.  Nothing else in the
//! workspace computes hashes.

pub mod canonical;
pub mod chain;

pub use canonical::canonical_bytes;
pub use chain::{hash_record, recompute_hash};

// ── Tests ─────────────────────────────────────────────────────────────────────
