// Logging setup.
// Routes tracing output to a non-blocking log file because the terminal belongs to the TUI.

use std::fs;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{KickstartError, Result};

/// Install the global tracing subscriber, appending to `log_path`.
///
/// Lines are written by a background thread. Keep the returned guard alive
/// until exit; dropping it flushes whatever is still queued.
pub fn init(log_path: &Path, filter: &str) -> Result<WorkerGuard> {
    let filter = parse_filter(filter)?;
    let (writer, guard) = file_writer(log_path)?;

    subscriber(filter, writer)
        .try_init()
        .map_err(|e| KickstartError::Other(format!("failed to install logger: {}", e)))?;
    Ok(guard)
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| KickstartError::Config(format!("invalid log filter '{}': {}", filter, e)))
}

/// Never-rotating appender on `log_path`, wrapped in a non-blocking writer.
fn file_writer(log_path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = log_path
        .file_name()
        .ok_or_else(|| {
            KickstartError::Config(format!("log path '{}' has no file name", log_path.display()))
        })?
        .to_string_lossy()
        .into_owned();
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| KickstartError::Other(format!("failed to open log file: {}", e)))?;

    Ok(tracing_appender::non_blocking(appender))
}

fn subscriber(filter: EnvFilter, writer: NonBlocking) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .finish()
}
