//! Pluggable remote storage clients.
//!
//! Presence-checking and archival logic never talk to a remote API
//! directly; they go through `StorageClient`.  The real implementation
//! shells out to the `aws` binary (the store enforces write-once
//! semantics, this side only copies and lists), and `InMemoryStorage` is
//! the reference fake for tests.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use sealog_contracts::{SealogError, SealogResult};

/// A minimal remote object-store interface: copy a local file in, list
/// keys under a prefix.
///
/// Implementations must report an unreachable or missing backend as
/// `StorageUnavailable` — never as an empty listing, which would read as a
/// false "not present".
pub trait StorageClient: Send + Sync {
    /// Copy the file at `local` to `bucket` under `key`.  The local file
    /// is left untouched.
    fn copy(&self, local: &Path, bucket: &str, key: &str) -> SealogResult<()>;

    /// List object keys under `key_prefix` in `bucket`.  An empty result
    /// means "no objects", not "could not look".
    fn list(&self, bucket: &str, key_prefix: &str) -> SealogResult<Vec<String>>;
}

// ── aws CLI client ────────────────────────────────────────────────────────────

/// Storage client backed by the `aws` command-line tool.
///
/// Credentials, region, and network timeouts are the CLI's own concern;
/// this client only distinguishes "worked", "nothing there", and
/// "unavailable".
#[derive(Debug, Default)]
pub struct AwsCliStorage;

impl AwsCliStorage {
    fn run(&self, args: &[&str]) -> SealogResult<std::process::Output> {
        match Command::new("aws").args(args).output() {
            Ok(output) => Ok(output),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SealogError::StorageUnavailable {
                reason: "aws CLI not found on PATH".to_string(),
            }),
            Err(e) => Err(SealogError::StorageUnavailable {
                reason: format!("aws CLI failed to start: {}", e),
            }),
        }
    }
}

impl StorageClient for AwsCliStorage {
    fn copy(&self, local: &Path, bucket: &str, key: &str) -> SealogResult<()> {
        let source = local.to_string_lossy();
        let target = format!("s3://{}/{}", bucket, key);
        let output = self.run(&["s3", "cp", source.as_ref(), &target])?;

        if !output.status.success() {
            return Err(SealogError::StorageUnavailable {
                reason: format!(
                    "aws s3 cp to {} failed: {}",
                    target,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }

    fn list(&self, bucket: &str, key_prefix: &str) -> SealogResult<Vec<String>> {
        let target = format!("s3://{}/{}/", bucket, key_prefix);
        let output = self.run(&["s3", "ls", &target])?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            // `aws s3 ls` exits 1 with no output when the prefix is empty.
            if stdout.trim().is_empty() && output.stderr.is_empty() {
                return Ok(Vec::new());
            }
            return Err(SealogError::StorageUnavailable {
                reason: format!(
                    "aws s3 ls {} failed: {}",
                    target,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // Listing lines end in the object name; directories are skipped.
        let keys = stdout
            .lines()
            .filter_map(|line| line.split_whitespace().last())
            .filter(|name| !name.ends_with('/'))
            .map(|name| format!("{}/{}", key_prefix, name))
            .collect();
        Ok(keys)
    }
}

// ── In-memory fake ────────────────────────────────────────────────────────────

/// The reference in-memory storage client, for tests.
///
/// Keys are stored as `bucket/key` in a sorted map so prefix listing is a
/// range scan.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored object's bytes, if present.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("storage lock poisoned")
            .get(&format!("{}/{}", bucket, key))
            .cloned()
    }

    /// Seed an object directly, bypassing `copy`.  For test fixtures.
    pub fn insert(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .expect("storage lock poisoned")
            .insert(format!("{}/{}", bucket, key), bytes);
    }
}

impl StorageClient for InMemoryStorage {
    fn copy(&self, local: &Path, bucket: &str, key: &str) -> SealogResult<()> {
        let bytes = std::fs::read(local)?;
        self.insert(bucket, key, bytes);
        Ok(())
    }

    fn list(&self, bucket: &str, key_prefix: &str) -> SealogResult<Vec<String>> {
        let full_prefix = format!("{}/{}/", bucket, key_prefix);
        let objects = self.objects.lock().expect("storage lock poisoned");
        Ok(objects
            .range(full_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&full_prefix))
            .map(|(k, _)| k[bucket.len() + 1..].to_string())
            .collect())
    }
}
