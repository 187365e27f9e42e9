use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "./logs";
const LOG_FILE_NAME: &str = "folder-icon.log";

/// Where the log file goes: `LOG_DIR`, or `./logs` when unset or blank.
fn log_dir() -> PathBuf {
    env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}

fn level_filter() -> EnvFilter {
    let directive = env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Console output stays terse; the file keeps timestamps and targets for
/// later inspection. The returned guard flushes the file writer on drop.
pub fn init_logger() -> WorkerGuard {
    let dir = log_dir();
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE_NAME));

    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .compact()
        .without_time()
        .with_target(false);
    let file = fmt::layer().with_writer(file_writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(level_filter())
        .with(console)
        .with(file)
        .init();

    debug!("Logging to {}", dir.join(LOG_FILE_NAME).display());
    guard
}
