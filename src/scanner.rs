//! Directory scanner.
//! Lists the incoming directory once per poll cycle, picks files that carry the
//! transfer suffix, have been quiet for the write cooldown and are not already
//! moving, and hands each one to the [`Coordinator`].
//!
//! Failure policy:
//! - The incoming directory cannot be listed: fatal, returned to the caller.
//! - One entry cannot be read or stat'ed: logged and skipped for this cycle.
//! - Cooldown not elapsed / already moving: normal flow, logged at info.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::errors::MoverError;
use crate::shutdown::ShutdownSignal;

/// Fixed delay between poll cycles.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Granularity at which the sleep between cycles notices a shutdown request.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// A transfer-ready file seen during one cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub modified: SystemTime,
}

impl Candidate {
    /// Time since the last write as seen at `now`; zero for a future mtime.
    pub fn idle_for(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or_default()
    }
}

/// What a single cycle did, mostly for tests and the debug summary line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Sources handed to the coordinator this cycle
    pub dispatched: Vec<PathBuf>,
    /// Suffix matches still inside their write cooldown
    pub cooling: usize,
    /// Suffix matches skipped because a move is outstanding
    pub in_flight: usize,
    /// Entries skipped on a per-entry I/O error
    pub skipped: usize,
}

/// Exact, case-sensitive suffix strip on the raw name bytes, so names that are not
/// valid UTF-8 still match. `None` when `name` does not end with `suffix`.
pub fn strip_transfer_suffix<'a>(name: &'a OsStr, suffix: &str) -> Option<&'a OsStr> {
    if suffix.is_empty() {
        return Some(name);
    }
    let bytes = name.as_encoded_bytes();
    let stem = bytes.strip_suffix(suffix.as_bytes())?;
    // SAFETY: `stem` comes from `name` and ends immediately before `suffix`, a
    // non-empty valid UTF-8 substring, which is a permitted split point.
    Some(unsafe { OsStr::from_encoded_bytes_unchecked(stem) })
}

/// `now >= modified + cooldown`. Modification times in the future are never quiescent.
pub fn is_write_quiescent(modified: SystemTime, now: SystemTime, cooldown: Duration) -> bool {
    now.duration_since(modified)
        .map(|age| age >= cooldown)
        .unwrap_or(false)
}

#[derive(Debug)]
pub struct Scanner {
    config: Arc<Config>,
    coordinator: Arc<Coordinator>,
    shutdown: ShutdownSignal,
    interval: Duration,
}

impl Scanner {
    pub fn new(config: Arc<Config>, coordinator: Arc<Coordinator>, shutdown: ShutdownSignal) -> Self {
        Self {
            config,
            coordinator,
            shutdown,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the poll interval (tests only need short cycles).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until shutdown is requested. Only a fatal listing error ends the loop early.
    pub fn run(&self) -> Result<(), MoverError> {
        info!(
            "monitoring for files: {} -> {}",
            self.config.incoming_dir.display(),
            self.config.storage_dir.display()
        );

        while !self.shutdown.is_requested() {
            let report = self.scan_once(SystemTime::now())?;
            let running = self.coordinator.reap();
            debug!(
                dispatched = report.dispatched.len(),
                cooling = report.cooling,
                in_flight = report.in_flight,
                skipped = report.skipped,
                running,
                "scan cycle finished"
            );
            self.sleep_until_next_cycle();
        }

        info!("shutdown requested; no longer scanning");
        Ok(())
    }

    /// One poll cycle evaluated at `now`.
    pub fn scan_once(&self, now: SystemTime) -> Result<ScanReport, MoverError> {
        let dir = &self.config.incoming_dir;
        let suffix = self.config.transfer_suffix.as_str();
        let entries = fs::read_dir(dir).map_err(|source| MoverError::SourceUnreadable {
            path: dir.clone(),
            source,
        })?;

        let mut report = ScanReport::default();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    report.skipped += 1;
                    continue;
                }
            };

            let file_name = entry.file_name();
            let Some(base) = strip_transfer_suffix(&file_name, suffix) else {
                continue;
            };

            let src = dir.join(&file_name);
            let modified = match fs::metadata(&src).and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    warn!(src = %src.display(), error = %e, "cannot read modification time");
                    report.skipped += 1;
                    continue;
                }
            };

            if !is_write_quiescent(modified, now, self.config.write_cooldown) {
                info!(src = %src.display(), "write cooldown in effect");
                report.cooling += 1;
                continue;
            }

            if self.coordinator.is_in_flight(&src) {
                info!(src = %src.display(), "file currently moving");
                report.in_flight += 1;
                continue;
            }

            let candidate = Candidate {
                destination: self.config.storage_dir.join(base),
                source: src,
                modified,
            };
            self.dispatch(candidate, now, &mut report);
        }

        Ok(report)
    }

    fn dispatch(&self, candidate: Candidate, now: SystemTime, report: &mut ScanReport) {
        debug!(
            src = %candidate.source.display(),
            dst = %candidate.destination.display(),
            idle_secs = candidate.idle_for(now).as_secs(),
            "dispatching move"
        );
        let Candidate {
            source, destination, ..
        } = candidate;
        if self.coordinator.begin_move(source.clone(), destination) {
            report.dispatched.push(source);
        } else {
            // Lost a race with a move registered between the check and now.
            info!(src = %source.display(), "file currently moving");
            report.in_flight += 1;
        }
    }

    fn sleep_until_next_cycle(&self) {
        let deadline = Instant::now() + self.interval;
        while !self.shutdown.is_requested() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
