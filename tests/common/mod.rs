#![allow(dead_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use plot_mover::{Config, Coordinator, Scanner, ShutdownSignal};
use tempfile::TempDir;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends written bytes into a shared in-memory buffer.
#[derive(Clone)]
pub struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a scoped subscriber and return its result plus everything logged.
/// Move threads spawned inside `f` inherit the subscriber.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer()
        .with_writer(make_writer)
        .with_ansi(false)
        .with_target(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new("info")).with(layer);
    let dispatch = tracing::Dispatch::new(subscriber);
    let out = tracing::dispatcher::with_default(&dispatch, f);
    let text = String::from_utf8_lossy(&buf.lock().unwrap()).to_string();
    (out, text)
}

/// incoming/ and storage/ under a fresh temp dir (canonicalized).
pub struct Dirs {
    _td: TempDir,
    pub incoming: PathBuf,
    pub storage: PathBuf,
}

pub fn dirs() -> Dirs {
    let td = tempfile::tempdir().unwrap();
    let base = std::fs::canonicalize(td.path()).unwrap();
    let incoming = base.join("incoming");
    let storage = base.join("storage");
    std::fs::create_dir_all(&incoming).unwrap();
    std::fs::create_dir_all(&storage).unwrap();
    Dirs {
        _td: td,
        incoming,
        storage,
    }
}

/// Push the modification time `secs` seconds into the past.
pub fn age(path: &Path, secs: u64) {
    let t = SystemTime::now() - Duration::from_secs(secs);
    filetime::set_file_mtime(path, FileTime::from_system_time(t)).unwrap();
}

pub fn scanner(cfg: Config, coordinator: Arc<Coordinator>) -> Scanner {
    Scanner::new(Arc::new(cfg), coordinator, ShutdownSignal::new())
}
