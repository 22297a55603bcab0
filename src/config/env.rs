//! Environment-driven configuration.
//! - Loads an optional key=value env file (dotenvy) without overriding variables already set.
//! - Reads the `FARMER_*` variables; empty values count as unset.
//! - Bad values never abort startup: they fall back to defaults and leave a warning behind.
//!
//! Warnings are returned rather than logged because tracing is initialized from the
//! loaded config; the caller emits them once the subscriber is up.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{Config, LogFormat, LogLevel};
use super::{
    ENV_ENV_FILE, ENV_FILE_DEFAULT, ENV_INCOMING_PATH, ENV_LOG_FILE, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_STORAGE_PATH, ENV_TRANSFER_SUFFIX, ENV_WRITE_COOLDOWN,
    WRITE_COOLDOWN_SECS_DEFAULT,
};

/// What happened to the supplementary env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    /// Absent, unreadable or unparsable; never fatal.
    NotLoaded { path: PathBuf, reason: String },
    /// Config built from an explicit lookup, no file involved.
    Skipped,
}

/// Result of configuration loading: the config plus deferred warnings.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: Vec<String>,
    pub env_file: EnvFileStatus,
}

/// Load the env file (explicit path, else `FARMER_ENV_FILE`, else `.env`) and read the
/// process environment.
/// A file that fails to parse is skipped with a warning; variables from lines before the
/// bad one may already have been applied.
pub fn load(env_file: Option<&Path>) -> ConfigLoad {
    let path = env_file
        .map(Path::to_path_buf)
        .or_else(|| non_empty(env::var(ENV_ENV_FILE).ok()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(ENV_FILE_DEFAULT));

    let mut parse_warning = None;
    let status = match dotenvy::from_path(&path) {
        Ok(()) => EnvFileStatus::Loaded(path),
        Err(dotenvy::Error::Io(e)) => EnvFileStatus::NotLoaded {
            path,
            reason: e.to_string(),
        },
        Err(e) => {
            parse_warning = Some(format!("error loading env file {}: {e}", path.display()));
            EnvFileStatus::NotLoaded {
                path,
                reason: e.to_string(),
            }
        }
    };

    let mut load = from_lookup(|key| env::var(key).ok());
    load.env_file = status;
    if let Some(w) = parse_warning {
        load.warnings.insert(0, w);
    }
    load
}

/// Build a config from an arbitrary key lookup. Used by `load` and by tests.
pub fn from_lookup<F>(lookup: F) -> ConfigLoad
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| non_empty(lookup(key));
    let mut cfg = Config::default();
    let mut warnings = Vec::new();

    if let Some(p) = get(ENV_INCOMING_PATH) {
        cfg.incoming_dir = PathBuf::from(p);
    }
    if let Some(p) = get(ENV_STORAGE_PATH) {
        cfg.storage_dir = PathBuf::from(p);
    }

    if let Some(raw) = get(ENV_WRITE_COOLDOWN) {
        match parse_cooldown(&raw) {
            Some(d) => cfg.write_cooldown = d,
            None => warnings.push(format!(
                "could not parse {ENV_WRITE_COOLDOWN}='{raw}', using default of {WRITE_COOLDOWN_SECS_DEFAULT}s"
            )),
        }
    }

    if let Some(s) = get(ENV_TRANSFER_SUFFIX) {
        cfg.transfer_suffix = s;
    }

    if let Some(raw) = get(ENV_LOG_LEVEL) {
        match LogLevel::parse(&raw) {
            Some(lvl) => cfg.log_level = lvl,
            None => warnings.push(format!(
                "unknown {ENV_LOG_LEVEL}='{raw}', using '{}'",
                LogLevel::default()
            )),
        }
    }
    if let Some(raw) = get(ENV_LOG_FORMAT) {
        match raw.parse::<LogFormat>() {
            Ok(fmt) => cfg.log_format = fmt,
            Err(e) => warnings.push(format!("{e}; using text logs")),
        }
    }
    cfg.log_file = get(ENV_LOG_FILE).map(PathBuf::from);

    ConfigLoad {
        config: cfg,
        warnings,
        env_file: EnvFileStatus::Skipped,
    }
}

/// Whole, non-negative seconds after trimming.
fn parse_cooldown(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[inline]
fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}
