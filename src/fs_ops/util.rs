#[cfg(unix)]
use std::fs::File;
use std::io;
#[cfg(unix)]
use std::path::Path;

/// True when `e` is EXDEV / ERROR_NOT_SAME_DEVICE (rename across filesystems).
pub fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind has no stable CrossesDevices variant we can rely on,
    // so detect it via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            // EXDEV
            if code == 18 {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}
