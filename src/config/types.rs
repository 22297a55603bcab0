//! Core configuration types.
//! - Config holds the watch settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - LogFormat selects compact text or JSON log lines.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{
    INCOMING_PATH_DEFAULT, STORAGE_PATH_DEFAULT, TRANSFER_SUFFIX_DEFAULT,
    WRITE_COOLDOWN_SECS_DEFAULT,
};

/// Program-defined verbosity levels exposed to operators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "compact" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("invalid log format: '{s}'")),
        }
    }
}

/// Runtime configuration used by the scanner and coordinator.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory watched for transfer-ready files
    pub incoming_dir: PathBuf,
    /// Directory finished files are renamed into
    pub storage_dir: PathBuf,
    /// Minimum time since last modification before a file may move
    pub write_cooldown: Duration,
    /// Filename suffix marking a file as ready; stripped from the destination name
    pub transfer_suffix: String,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Text or JSON log lines
    pub log_format: LogFormat,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            incoming_dir: PathBuf::from(INCOMING_PATH_DEFAULT),
            storage_dir: PathBuf::from(STORAGE_PATH_DEFAULT),
            write_cooldown: Duration::from_secs(WRITE_COOLDOWN_SECS_DEFAULT),
            transfer_suffix: TRANSFER_SUFFIX_DEFAULT.to_string(),
            log_level: LogLevel::Normal,
            log_format: LogFormat::Text,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with explicit directories and cooldown; other fields use defaults.
    pub fn new(
        incoming_dir: impl Into<PathBuf>,
        storage_dir: impl Into<PathBuf>,
        write_cooldown: Duration,
    ) -> Self {
        Self {
            incoming_dir: incoming_dir.into(),
            storage_dir: storage_dir.into(),
            write_cooldown,
            ..Default::default()
        }
    }

    /// Replace the transfer suffix (builder style).
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.transfer_suffix = suffix.into();
        self
    }
}
