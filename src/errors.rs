//! Typed error definitions for plot_mover.
//! Only the fatal failure modes live here; per-file problems are logged and skipped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoverError {
    #[error("Cannot list incoming directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot resolve {name} '{path}' to an absolute path: {source}")]
    PathUnresolvable {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoverError {
    /// Stable process exit status for each fatal kind.
    pub fn code(&self) -> i32 {
        match self {
            MoverError::SourceUnreadable { .. } => 2,
            MoverError::PathUnresolvable { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_nonzero() {
        let unreadable = MoverError::SourceUnreadable {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let unresolvable = MoverError::PathUnresolvable {
            name: "incoming",
            path: PathBuf::new(),
            source: io::Error::from(io::ErrorKind::InvalidInput),
        };
        assert_eq!(unreadable.code(), 2);
        assert_eq!(unresolvable.code(), 3);
        assert!(unreadable.to_string().contains("/nope"));
        assert!(unresolvable.to_string().contains("incoming"));
    }
}
