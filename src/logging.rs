//! Tracing setup for binaries embedding the tree.
//!
//! One global subscriber with two fmt layers: a console layer on stderr, so
//! anything a binary prints on stdout stays clean, and an uncoloured layer on
//! a per-launch file in the app log folder. Only the newest files are kept.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

const KEEP_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "dirpane";
const LOG_EXTENSION: &str = "log";
/// Filter directives read before falling back to `RUST_LOG`.
const LOG_FILTER_ENV: &str = "DIRPANE_LOG";
const DEFAULT_FILTER: &str = "info";

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No log directory available: {0}")]
    NoLogDir(app_dirs::AppDirError),
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to prune old logs in {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file name: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to create log file {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("A global tracing subscriber is already installed: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Start logging into the app log folder. Later calls do nothing.
pub fn init() -> Result<(), LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }
    let log_dir = app_dirs::logs_dir().map_err(LoggingError::NoLogDir)?;
    init_in(&log_dir)
}

/// Start logging with the log file placed in `log_dir`.
pub fn init_in(log_dir: &Path) -> Result<(), LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let file_name = log_file_name(local_now())?;
    let log_path = log_dir.join(&file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| LoggingError::CreateLogFile {
            path: log_path.clone(),
            source,
        })?;
    prune_old_logs(log_dir, KEEP_LOG_FILES)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(log_dir, file_name));
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        CONSOLE_TIME_FORMAT,
    );
    let subscriber = Registry::default()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = FILE_WRITER_GUARD.set(guard);

    tracing::info!(path = %log_path.display(), "Logging initialized");
    Ok(())
}

const CONSOLE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now.format(STAMP).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}_{stamp}.{LOG_EXTENSION}"))
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let prune_err = |source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir).map_err(prune_err)? {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.is_file() && is_log_file(&path) {
            logs.push((meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), path));
        }
    }
    for path in stale_logs(logs, keep) {
        fs::remove_file(&path).map_err(prune_err)?;
    }
    Ok(())
}

fn is_log_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
}

// Everything but the `keep` most recently modified files.
fn stale_logs(mut logs: Vec<(SystemTime, PathBuf)>, keep: usize) -> Vec<PathBuf> {
    logs.sort_by(|a, b| b.0.cmp(&a.0));
    logs.into_iter().skip(keep).map(|(_, path)| path).collect()
}
