//! Logging setup for the front ends.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file
//! under the platform data directory instead. `RUST_LOG` overrides the
//! default `info` filter in both cases.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

const LOG_DIR_ENV_VAR: &str = "FITNESS_PLANNER_LOG_DIR";
const APP_DATA_DIR: &str = "fitness-planner";
const LOG_FILE_NAME: &str = "fitness-planner.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// No platform-specific data directory could be resolved.
    #[error("No suitable data directory available for logs")]
    NoDataDir,
    /// Failed to create or access the log directory.
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(String),
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a subscriber writing to stderr.
/// # Errors
/// Returns `LoggingError::SetGlobal` if a subscriber is already installed.
pub fn init_stderr() -> Result<(), LoggingError> {
    fmt()
        .with_env_filter(build_env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::SetGlobal(e.to_string()))
}

/// Installs a subscriber writing to the log file and returns its path.
///
/// Subsequent calls are no-ops that return the same path.
/// # Errors
/// Returns `LoggingError` if the directory cannot be prepared or a
/// different subscriber is already installed.
pub fn init_file() -> Result<PathBuf, LoggingError> {
    let log_dir = log_directory()?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }

    let file_appender = rolling::never(&log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);

    let subscriber = Registry::default().with(build_env_filter()).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::SetGlobal(e.to_string()))?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("Logging initialized; log file at {}", log_path.display());
    Ok(log_path)
}

fn log_directory() -> Result<PathBuf, LoggingError> {
    let dir = match std::env::var(LOG_DIR_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => dirs::data_dir()
            .ok_or(LoggingError::NoDataDir)?
            .join(APP_DATA_DIR)
            .join("logs"),
    };
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
