//! Filesystem operations used by move tasks.

mod atomic;
mod util;

pub use atomic::try_atomic_move;
pub use util::is_cross_device;
