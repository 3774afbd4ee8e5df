//! Logging initialization for planboard.
//!
//! Server mode with `logging.to_file`: logs to `{logging.directory}/planboard-{datetime}.log`
//! Otherwise: logs to stderr, keeping stdout clean for command output

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes buffered file output when dropped; keep alive until exit.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set when file logging is active)
    pub log_file_path: Option<PathBuf>,
}

/// Filter directive from config, the `--debug` flag and `RUST_LOG`.
/// `RUST_LOG` wins when set.
pub fn filter_directive(config: &Config, debug_override: bool) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if debug_override {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    })
}

/// Log file name for a server run started at `started`
pub fn log_file_name(started: DateTime<Utc>) -> String {
    format!("planboard-{}.log", started.format("%Y%m%dT%H%M%SZ"))
}

/// Install the global subscriber.
///
/// Returns a `LoggingHandle` that must be kept alive for the duration of the program.
pub fn init_logging(
    config: &Config,
    is_server_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let filter = tracing_subscriber::EnvFilter::try_new(filter_directive(config, debug_override))
        .context("Invalid log filter")?;

    if is_server_mode && config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

        let log_filename = log_file_name(Utc::now());
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
