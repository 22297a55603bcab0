//! Transfer coordination.
//! - Owns the in-flight set: at most one move per source path at any time.
//! - Runs every accepted move on its own thread and keeps the handle so the
//!   app can drain outstanding renames on shutdown.
//!
//! Notes:
//! - The in-flight lock is only held for insert/remove/contains, never across the rename.
//! - Membership is released by a drop guard, so a panicking relocator still frees the path.
//! - Move threads inherit the caller's tracing dispatcher.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::fs_ops::{is_cross_device, try_atomic_move};

/// Performs the actual relocation of one file.
pub trait Relocator: Send + Sync + 'static {
    fn relocate(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// Same-filesystem rename; the production relocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomicRename;

impl Relocator for AtomicRename {
    fn relocate(&self, src: &Path, dst: &Path) -> io::Result<()> {
        try_atomic_move(src, dst)
    }
}

/// Cumulative move results since startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveStats {
    pub moved: u64,
    pub failed: u64,
}

pub struct Coordinator {
    in_flight: Mutex<HashSet<PathBuf>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    relocator: Box<dyn Relocator>,
    moved: AtomicU64,
    failed: AtomicU64,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("in_flight", &self.in_flight_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// Coordinator backed by an atomic rename.
    pub fn new() -> Self {
        Self::with_relocator(AtomicRename)
    }

    pub fn with_relocator(relocator: impl Relocator) -> Self {
        Self {
            in_flight: Mutex::new(HashSet::new()),
            tasks: Mutex::new(Vec::new()),
            relocator: Box::new(relocator),
            moved: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Whether `src` currently has a move outstanding.
    pub fn is_in_flight(&self, src: &Path) -> bool {
        self.set().contains(src)
    }

    pub fn in_flight_count(&self) -> usize {
        self.set().len()
    }

    pub fn stats(&self) -> MoveStats {
        MoveStats {
            moved: self.moved.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
        }
    }

    /// Register `src` and launch its move on a new thread.
    ///
    /// Returns `false` without spawning anything if `src` is already in flight.
    /// The caller never waits for the move; see [`Coordinator::drain`].
    pub fn begin_move(self: &Arc<Self>, src: PathBuf, dst: PathBuf) -> bool {
        if !self.register(&src) {
            return false;
        }

        let this = Arc::clone(self);
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let task_src = src.clone();
        let spawned = thread::Builder::new()
            .name("plot-move".into())
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || this.run_move(task_src, dst));
            });

        match spawned {
            Ok(handle) => {
                self.tasks().push(handle);
                true
            }
            Err(e) => {
                error!(src = %src.display(), error = %e, "failed to spawn move task");
                self.unregister(&src);
                false
            }
        }
    }

    /// Join finished move threads and return how many are still running.
    pub fn reap(&self) -> usize {
        let done: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks();
            let (done, pending) = mem::take(&mut *tasks)
                .into_iter()
                .partition(|h| h.is_finished());
            *tasks = pending;
            done
        };
        for handle in done {
            join_logged(handle);
        }
        self.tasks().len()
    }

    /// Block until every outstanding move has finished.
    pub fn drain(&self) {
        loop {
            let batch = mem::take(&mut *self.tasks());
            if batch.is_empty() {
                break;
            }
            debug!(count = batch.len(), "waiting for outstanding moves");
            for handle in batch {
                join_logged(handle);
            }
        }
    }

    fn run_move(&self, src: PathBuf, dst: PathBuf) {
        let _membership = InFlightGuard { owner: self, src: &src };

        info!(src = %src.display(), dst = %dst.display(), "moving");
        let outcome = match self.relocator.relocate(&src, &dst) {
            Ok(()) => {
                self.moved.fetch_add(1, Ordering::AcqRel);
                "moved"
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::AcqRel);
                if is_cross_device(&e) {
                    error!(
                        src = %src.display(),
                        dst = %dst.display(),
                        error = %e,
                        hint = "incoming and storage directories must share a filesystem",
                        "move failed"
                    );
                } else {
                    error!(src = %src.display(), dst = %dst.display(), error = %e, "move failed");
                }
                "failed"
            }
        };
        info!(src = %src.display(), dst = %dst.display(), outcome, "complete");
    }

    /// Insert-if-absent. `false` means the path was already in flight.
    fn register(&self, src: &Path) -> bool {
        self.set().insert(src.to_path_buf())
    }

    /// Remove-if-present.
    fn unregister(&self, src: &Path) -> bool {
        self.set().remove(src)
    }

    fn set(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases in-flight membership when the move finishes, even by panic.
struct InFlightGuard<'a> {
    owner: &'a Coordinator,
    src: &'a Path,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.unregister(self.src);
    }
}

fn join_logged(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!("move task panicked");
    }
}
