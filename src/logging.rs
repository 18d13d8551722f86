//! File logger handed to the pipeline instead of a process-global subscriber.

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use crate::config::LogConfig;

/// Owns the subscriber and the background writer. Dropping it flushes
/// buffered lines to the log file.
pub struct Logger {
    dispatch: Dispatch,
    _guard: WorkerGuard,
}

impl Logger {
    /// Opens (or creates) the log file for appending.
    pub fn new(config: &LogConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file)
            .with_context(|| format!("open log file {}", config.file.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::new(config.level.as_str().to_ascii_lowercase());
        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .compact()
                .with_target(false)
                .with_ansi(false),
        );

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            _guard: guard,
        })
    }

    /// Runs `f` with this logger as the current subscriber.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
