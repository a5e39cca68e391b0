use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "ncap.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory `{path}`: {source}")]
    Dir { path: PathBuf, source: io::Error },

    #[error("bad log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("a global subscriber is already installed: {0}")]
    Install(String),
}

/// Logs to stderr and to a daily-rolling file in `dir`. Keep the returned
/// guard alive for as long as logs should be flushed.
pub fn init_logging(dir: &Path, filter: &str) -> Result<WorkerGuard, LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::Dir {
        path: dir.to_path_buf(),
        source,
    })?;
    let filter = EnvFilter::try_new(filter)?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (file, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_thread_names(true)
        .with_ansi(false)
        .with_writer(file.and(io::stderr))
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))?;

    Ok(guard)
}
