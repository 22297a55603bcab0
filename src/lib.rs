//! Core library for `plot_mover`.
//!
//! Watches an incoming directory for files carrying the transfer suffix and
//! renames them into plot storage once their writer has gone quiet.
//!
//! - [`scanner`] lists the incoming directory once per poll cycle and decides eligibility.
//! - [`coordinator`] owns the in-flight set and runs each move as its own task.
//! - [`config`] reads `FARMER_*` variables (plus an optional env file).

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod scanner;
pub mod shutdown;

pub use config::{Config, ConfigLoad, LogFormat, LogLevel};
pub use coordinator::{AtomicRename, Coordinator, MoveStats, Relocator};
pub use errors::MoverError;
pub use scanner::{Candidate, POLL_INTERVAL, ScanReport, Scanner, strip_transfer_suffix};
pub use shutdown::ShutdownSignal;
