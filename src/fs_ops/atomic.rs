//! Atomic rename helper.
//! - Performs a same-filesystem rename; never copies and never replaces an existing
//!   destination on platforms where rename refuses to.
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::io;
use std::path::Path;

pub fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    // Unix: fsync the destination directory to persist the rename (best-effort).
    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn rename_moves_content() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("a.xfer");
        src.write_str("plot").unwrap();
        let dst = temp.child("out").child("a");
        temp.child("out").create_dir_all().unwrap();

        try_atomic_move(src.path(), dst.path()).unwrap();

        assert!(!src.path().exists());
        assert_eq!(std::fs::read_to_string(dst.path()).unwrap(), "plot");
    }

    #[test]
    fn missing_destination_dir_is_an_error_and_keeps_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("c.xfer");
        src.touch().unwrap();
        let dst = temp.child("missing").child("c");

        let err = try_atomic_move(src.path(), dst.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(src.path().exists());
    }
}
