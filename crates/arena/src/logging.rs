//! Logging setup: session log file plus stderr.
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.
///
/// Logs go to `<log_dir>/<session>/arena.log` and to stderr. The filter comes
/// from `RUST_LOG`, defaulting to `info`. The returned guard flushes the file
/// writer and must be held until exit.
pub fn setup_logging(log_dir: &Path, session: &str) -> Result<WorkerGuard> {
    let session_log_dir = log_dir.join(session);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "arena.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session);
    tracing::debug!("Log file: {}/arena.log", session_log_dir.display());

    Ok(guard)
}
