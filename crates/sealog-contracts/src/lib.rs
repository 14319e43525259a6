//! # sealog-contracts
//!
//! Shared types and contracts for the sealog audit subsystem.
//!
//! All crates in the workspace import from here.  No business logic lives
//! in this crate — only data definitions, the error taxonomy, resolved
//! configuration, and the clock seam.

pub mod clock;
pub mod config;
pub mod error;
pub mod record;
pub mod segment;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{SealogError, SealogResult};
pub use record::{AuditRecord, Timestamp};
pub use segment::{date_key_prefix, ArchivePointer, LogSegment};
