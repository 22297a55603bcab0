//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - JSON/text formatting is selected via LogFormat and applies to every sink.
//! - If `log_file` is provided and can be opened for append, a non-blocking file layer is added.

use anyhow::Result;
use chrono::Local;
use plot_mover::output as out;
use plot_mover::{LogFormat, LogLevel};
use std::fmt as stdfmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    EnvFilter::default().add_directive(level_filter.into())
}

/// One formatting layer writing to `writer`.
fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .with_thread_names(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base.compact().boxed(),
    }
}

/// Best-effort create the parent directory, then open for append.
fn open_log_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize tracing from the loaded config. Returns an optional WorkerGuard
/// if a file appender is created (must be held until shutdown to flush logs).
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    format: LogFormat,
) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));
    let ansi = atty::is(atty::Stream::Stdout) && format == LogFormat::Text;

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(format, io::stdout, ansi)];
    let mut guard = None;

    if let Some(path) = log_file {
        match open_log_append(path) {
            Ok(file) => {
                let (writer, g) = tracing_appender::non_blocking(file);
                layers.push(fmt_layer(format, writer, false));
                guard = Some(g);
            }
            Err(e) => out::print_warn(&format!(
                "Requested file logging to '{}' was not enabled ({e}). Logs will continue to stdout.",
                path.display()
            )),
        }
    }

    registry().with(layers).with(env_filter).try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn level_mapping_is_one_step_more_verbose_than_name() {
        assert_eq!(to_level_filter(&LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(&LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(&LogLevel::Info), LevelFilter::DEBUG);
        assert_eq!(to_level_filter(&LogLevel::Debug), LevelFilter::TRACE);
    }

    #[test]
    fn json_file_layer_writes_structured_lines() {
        let td = tempdir().unwrap();
        let log_path = td.path().join("logs").join("plot_mover.log");
        let file = open_log_append(&log_path).expect("open log file");
        let (writer, guard) = tracing_appender::non_blocking(file);

        let subscriber = registry()
            .with(vec![fmt_layer(LogFormat::Json, writer, false)])
            .with(env_filter_from_level(LevelFilter::INFO));
        let dispatch = tracing::Dispatch::new(subscriber);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(src = "/in/a.xfer", "moving");
            tracing::debug!("filtered out");
        });
        drop(guard);

        let contents = fs::read_to_string(&log_path).unwrap();
        let first = contents.lines().next().expect("one line logged");
        let v: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(v["fields"]["message"], "moving");
        assert_eq!(v["fields"]["src"], "/in/a.xfer");
        assert!(!contents.contains("filtered out"));
    }
}
