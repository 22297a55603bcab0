//! Application orchestrator.
//! Loads config, initializes logging, installs the signal handler, resolves paths,
//! runs the scanner until shutdown (or a fatal error), then drains outstanding moves.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use plot_mover::config::{self, ConfigLoad, env::EnvFileStatus};
use plot_mover::{Coordinator, Scanner, ShutdownSignal};

use crate::logging::init_tracing;

/// Run the daemon. Returns only on shutdown or a fatal configuration error.
pub fn run() -> Result<()> {
    let ConfigLoad {
        mut config,
        warnings,
        env_file,
    } = config::load(None);

    // Held until return so the file appender flushes.
    let _log_guard = init_tracing(&config.log_level, config.log_file.as_deref(), config.log_format)
        .context("failed to initialize logging")?;

    match &env_file {
        EnvFileStatus::Loaded(path) => info!(path = %path.display(), "loaded env file"),
        EnvFileStatus::NotLoaded { path, reason } => {
            info!(path = %path.display(), %reason, "no env file loaded")
        }
        EnvFileStatus::Skipped => {}
    }
    for w in &warnings {
        warn!("{w}");
    }

    if let Err(e) = config.resolve_paths() {
        error!(code = e.code(), error = %e, "cannot resolve configured paths");
        return Err(e.into());
    }
    info!(
        cooldown_secs = config.write_cooldown.as_secs(),
        suffix = %config.transfer_suffix,
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();
    {
        let shutdown = shutdown.clone();
        // SIGINT, SIGTERM and SIGHUP all request a drained shutdown.
        ctrlc::set_handler(move || shutdown.request())
            .context("failed to install signal handler")?;
    }

    let coordinator = Arc::new(Coordinator::new());
    let scanner = Scanner::new(Arc::new(config), Arc::clone(&coordinator), shutdown);
    let result = scanner.run();
    if let Err(e) = &result {
        error!(code = e.code(), error = %e, "fatal error; stopping");
    }

    let pending = coordinator.reap();
    if pending > 0 {
        info!(pending, "waiting for in-progress moves to finish");
    }
    coordinator.drain();
    let stats = coordinator.stats();
    info!(moved = stats.moved, failed = stats.failed, "stopped");

    result.map_err(Into::into)
}
