//! Configuration: types, `FARMER_*` environment loading and path resolution.
//! Loaded once at startup and immutable afterwards.

pub mod env;
pub mod paths;
pub mod types;

pub use env::{ConfigLoad, load};
pub use paths::resolve_absolute;
pub use types::{Config, LogFormat, LogLevel};

/// Defaults applied when a variable is unset or empty.
pub const INCOMING_PATH_DEFAULT: &str = "./";
pub const STORAGE_PATH_DEFAULT: &str = "./";
pub const WRITE_COOLDOWN_SECS_DEFAULT: u64 = 30;
pub const TRANSFER_SUFFIX_DEFAULT: &str = ".xfer";
pub const ENV_FILE_DEFAULT: &str = ".env";

pub const ENV_INCOMING_PATH: &str = "FARMER_INCOMING_TRANSFER_PATH";
pub const ENV_STORAGE_PATH: &str = "FARMER_PLOT_STORAGE_PATH";
pub const ENV_WRITE_COOLDOWN: &str = "FARMER_FILE_WRITE_COOLDOWN_SECONDS";
pub const ENV_TRANSFER_SUFFIX: &str = "FARMER_TRANSFER_SUFFIX";
pub const ENV_LOG_LEVEL: &str = "FARMER_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "FARMER_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "FARMER_LOG_FILE";
pub const ENV_ENV_FILE: &str = "FARMER_ENV_FILE";
