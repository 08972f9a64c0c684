//! Logging initialization
//!
//! Logs go to stderr so stdout stays clean for the run summary. When a log
//! directory is configured, the same events are also appended to
//! `fetch_ibov_log_<YYYY-MM-DD>.log` there.

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name for a date
pub fn log_file_name(date: NaiveDate) -> String {
    format!("fetch_ibov_log_{}.log", date.format("%Y-%m-%d"))
}

/// Log file path for a directory and date
pub fn log_file_path(directory: &Path, date: NaiveDate) -> PathBuf {
    directory.join(log_file_name(date))
}

/// Install the process-wide subscriber
///
/// `RUST_LOG` overrides the configured level; `verbose` raises the default to
/// debug. Returns the log file path when file logging is on.
pub fn init(config: &LoggingConfig, verbose: bool, date: NaiveDate) -> Result<Option<PathBuf>> {
    let level: Level = if verbose {
        Level::DEBUG
    } else {
        config.level.into()
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let console = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, path) = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let path = log_file_path(directory, date);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))?;

    Ok(path)
}
