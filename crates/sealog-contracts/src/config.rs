//! Process configuration, resolved once at startup.
//!
//! Business logic never reads the environment directly: `Config::from_env`
//! resolves every input into an immutable value that is handed to each
//! component.  An unset archive bucket or backend URL is a deliberate
//! opt-out, not an error — the corresponding operations report "skipped".

use std::env;
use std::path::PathBuf;

/// Default directory for local log segments.
pub const DEFAULT_LOG_DIR: &str = "./audit-log";

/// Default remote key prefix for archived segments.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "audit-logs";

/// Resolved, immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the open segment and rotated segments.
    pub log_dir: PathBuf,
    /// Remote bucket for immutable archival.  `None` disables archival and
    /// presence checks.
    pub archive_bucket: Option<String>,
    /// Key prefix under which archived segments are partitioned by date.
    pub archive_prefix: String,
    /// Base URL of the backend the smoke probes target.  `None` disables
    /// the probes.
    pub backend_url: Option<String>,
}

impl Config {
    /// Resolve configuration from process environment variables:
    /// `AUDIT_LOG_DIR`, `AUDIT_ARCHIVE_BUCKET`, `AUDIT_ARCHIVE_PREFIX`,
    /// `BACKEND_BASE_URL`.
    pub fn from_env() -> Self {
        Self::resolve(|name| env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary lookup function.
    ///
    /// Empty values are treated as unset so that `AUDIT_ARCHIVE_BUCKET=""`
    /// behaves the same as the variable being absent.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            log_dir: get("AUDIT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            archive_bucket: get("AUDIT_ARCHIVE_BUCKET"),
            archive_prefix: get("AUDIT_ARCHIVE_PREFIX")
                .unwrap_or_else(|| DEFAULT_ARCHIVE_PREFIX.to_string()),
            backend_url: get("BACKEND_BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
        }
    }
}
