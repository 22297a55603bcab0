//! Absolute path resolution for the watched and storage directories.
//! Resolution is lexical (no symlink resolution, no existence requirement) so a
//! storage directory that appears later is still usable.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::Config;
use crate::errors::MoverError;

/// Resolve `path` against the current working directory.
pub fn resolve_absolute(path: &Path, name: &'static str) -> Result<PathBuf, MoverError> {
    std::path::absolute(path).map_err(|source| MoverError::PathUnresolvable {
        name,
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Make both directories absolute in place. Fatal on failure.
    pub fn resolve_paths(&mut self) -> Result<(), MoverError> {
        self.incoming_dir = resolve_absolute(&self.incoming_dir, "incoming directory")?;
        self.storage_dir = resolve_absolute(&self.storage_dir, "storage directory")?;
        debug!(
            incoming = %self.incoming_dir.display(),
            storage = %self.storage_dir.display(),
            "Resolved absolute paths"
        );

        if !self.storage_dir.is_dir() {
            warn!(
                storage = %self.storage_dir.display(),
                "storage directory does not exist yet; moves will fail until it is created"
            );
        }
        Ok(())
    }
}
