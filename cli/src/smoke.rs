//! Backend health/session smoke probes.
//!
//! These checks target collaborators outside the audit subsystem.  A probe
//! either reaches its endpoint and gets a success status, or fails; probe
//! failures are never chain-integrity failures.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use sealog_contracts::{SealogError, SealogResult};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe the backend's health and session endpoints.
pub fn run(base_url: &str) -> SealogResult<()> {
    let client = Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(|e| SealogError::ProbeFailed {
            reason: format!("cannot build HTTP client: {}", e),
        })?;

    probe(&client, &format!("{}/api/health", base_url))?;
    probe(&client, &format!("{}/api/auth/session", base_url))?;
    Ok(())
}

fn probe(client: &Client, url: &str) -> SealogResult<()> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| SealogError::ProbeFailed {
            reason: format!("GET {} failed: {}", url, e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SealogError::ProbeFailed {
            reason: format!("GET {} returned {}", url, status),
        });
    }

    debug!(url = %url, status = %status, "probe succeeded");
    println!("probe OK: {}", url);
    Ok(())
}
