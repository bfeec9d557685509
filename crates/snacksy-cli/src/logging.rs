//! Tracing setup: everything at the configured level goes to a daily log
//! file, warnings and errors also go to stderr.

use anyhow::{Context, Result};
use snacksy_core::config::AppConfig;
use snacksy_infrastructure::SnacksyPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives read from the environment, overriding `log_level`.
pub const LOG_ENV: &str = "SNACKSY_LOG";

const LOG_FILE_PREFIX: &str = "snacksy.log";

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer is flushed.
pub fn init(config: &AppConfig, paths: &SnacksyPaths) -> Result<WorkerGuard> {
    let log_dir = paths.log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
