//! sealog — audit chain verification and archival tool.
//!
//! Subcommand-free flag interface; with no flags the default action is
//! chain validation plus the backend smoke checks.  Every selected
//! operation runs even if an earlier one fails; the process exits with
//! the first failure's code.  This binary is the only place error kinds
//! map to exit codes:
//!
//!   0  success, or an operation skipped because it is unconfigured
//!   1  unknown argument, chain-integrity failure, or probe failure
//!   2  audit log file missing
//!   3  remote storage tooling unavailable
//!   4  no archived objects for today's date partition
//!
//! Usage:
//!   sealog                      # validate + smoke
//!   sealog --validate
//!   sealog --archive --presence
//!   RUST_LOG=debug sealog --validate

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sealog_archive::{closed_segments, Archiver, AwsCliStorage};
use sealog_contracts::{Clock, Config, LogSegment, SealogError, SealogResult, SystemClock};
use sealog_verify::verify_segment;

mod smoke;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Tamper-evident audit log toolkit: validate the hash chain, archive
/// closed segments, check archive presence, probe the backend.
#[derive(Parser)]
#[command(
    name = "sealog",
    about = "Audit chain verification and archival",
    long_about = "Validates the hash-chained audit log, copies closed segments to the\n\
                  immutable archive, checks today's archive partition, and runs backend\n\
                  health/session smoke probes.  With no flags: validate + smoke."
)]
struct Cli {
    /// Validate today's chain integrity.
    #[arg(long)]
    validate: bool,

    /// Copy closed segments to the immutable archive.
    #[arg(long)]
    archive: bool,

    /// Check that today's archive partition contains at least one object.
    #[arg(long)]
    presence: bool,

    /// Run backend health/session smoke probes.
    #[arg(long)]
    smoke: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    // Default action: validate the chain and run the smoke checks.
    if !(cli.validate || cli.archive || cli.presence || cli.smoke) {
        cli.validate = true;
        cli.smoke = true;
    }

    let config = Config::from_env();

    std::process::exit(run(&cli, &config));
}

/// Run every selected operation in order, reporting each failure to
/// stderr as it happens.  Returns the first failure's exit code, or 0.
fn run(cli: &Cli, config: &Config) -> i32 {
    let mut code = 0;
    if cli.validate {
        code = report(run_validate(config), code);
    }
    if cli.archive {
        code = report(run_archive(config), code);
    }
    if cli.presence {
        code = report(run_presence(config), code);
    }
    if cli.smoke {
        code = report(run_smoke(config), code);
    }
    code
}

/// Fold one operation's outcome into the pending exit code.  The first
/// failure wins; later failures are still printed.
fn report(result: SealogResult<()>, code: i32) -> i32 {
    match result {
        Ok(()) => code,
        Err(e) => {
            eprintln!("sealog: {}", e);
            if code == 0 {
                exit_code(&e)
            } else {
                code
            }
        }
    }
}

// ── Operations ────────────────────────────────────────────────────────────────

fn run_validate(config: &Config) -> SealogResult<()> {
    let segment = LogSegment::for_date(&config.log_dir, SystemClock.today());
    let count = verify_segment(&segment.path)?;
    println!(
        "chain OK: {} records in {}",
        count,
        segment.path.display()
    );
    Ok(())
}

fn run_archive(config: &Config) -> SealogResult<()> {
    let Some(bucket) = config.archive_bucket.as_deref() else {
        println!("archive skipped: no bucket configured");
        return Ok(());
    };

    let archiver = Archiver::new(Box::new(AwsCliStorage), bucket, &config.archive_prefix);
    let segments = closed_segments(&config.log_dir, SystemClock.today())?;

    if segments.is_empty() {
        println!("archive: no closed segments");
        return Ok(());
    }

    for segment in &segments {
        let pointer = archiver.archive(segment)?;
        println!(
            "archived {} -> s3://{}/{}",
            segment.file_name(),
            pointer.bucket,
            pointer.key
        );
    }
    Ok(())
}

fn run_presence(config: &Config) -> SealogResult<()> {
    let Some(bucket) = config.archive_bucket.as_deref() else {
        println!("presence check skipped: no bucket configured");
        return Ok(());
    };

    let today = SystemClock.today();
    let archiver = Archiver::new(Box::new(AwsCliStorage), bucket, &config.archive_prefix);

    if archiver.check_presence(today)? {
        println!("archive present for {}", today);
        Ok(())
    } else {
        Err(SealogError::ArchiveAbsent { date: today })
    }
}

fn run_smoke(config: &Config) -> SealogResult<()> {
    let Some(base_url) = config.backend_url.as_deref() else {
        println!("smoke checks skipped: no backend URL configured");
        return Ok(());
    };
    smoke::run(base_url)
}

// ── Exit codes ────────────────────────────────────────────────────────────────

/// Map an error kind to the documented process exit code.
fn exit_code(err: &SealogError) -> i32 {
    match err {
        SealogError::MalformedRecord { .. }
        | SealogError::ChainBroken { .. }
        | SealogError::HashMismatch { .. } => 1,
        SealogError::LogMissing { .. } => 2,
        SealogError::StorageUnavailable { .. } => 3,
        SealogError::ArchiveAbsent { .. } => 4,
        _ => 1,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use sealog_contracts::SealogError;

    use super::exit_code;

    #[test]
    fn integrity_failures_exit_one() {
        let errors = [
            SealogError::MalformedRecord {
                line: 1,
                reason: "bad".to_string(),
            },
            SealogError::ChainBroken {
                line: 2,
                expected: "a".to_string(),
                found: "b".to_string(),
            },
            SealogError::HashMismatch { line: 3 },
        ];
        for err in errors {
            assert_eq!(exit_code(&err), 1, "{err}");
        }
    }

    #[test]
    fn operational_failures_get_distinct_codes() {
        assert_eq!(
            exit_code(&SealogError::LogMissing {
                path: PathBuf::from("/tmp/audit.log"),
            }),
            2
        );
        assert_eq!(
            exit_code(&SealogError::StorageUnavailable {
                reason: "aws CLI not found".to_string(),
            }),
            3
        );
        assert_eq!(
            exit_code(&SealogError::ArchiveAbsent {
                date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            }),
            4
        );
    }

    #[test]
    fn report_keeps_first_failing_code() {
        use super::report;

        let missing = || -> sealog_contracts::SealogResult<()> {
            Err(SealogError::LogMissing {
                path: PathBuf::from("/tmp/audit.log"),
            })
        };
        let probe_down = || -> sealog_contracts::SealogResult<()> {
            Err(SealogError::ProbeFailed {
                reason: "503".to_string(),
            })
        };

        // First failure sets the code; a later one does not override it.
        let code = report(missing(), 0);
        assert_eq!(code, 2);
        assert_eq!(report(probe_down(), code), 2);

        // Successes leave the pending code untouched.
        assert_eq!(report(Ok(()), 2), 2);
        assert_eq!(report(Ok(()), 0), 0);
    }

    #[test]
    fn probe_failure_exits_one() {
        assert_eq!(
            exit_code(&SealogError::ProbeFailed {
                reason: "503".to_string(),
            }),
            1
        );
    }
}
