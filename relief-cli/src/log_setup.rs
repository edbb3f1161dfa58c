use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Console logging, plus a daily-rotated file in `log_dir` when given.
///
/// `RUST_LOG` overrides `base_level`.
pub fn setup_logging(base_level: &str, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .with_context(|| format!("Invalid log filter: {base_level}"))?;

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let file_appender = tracing_appender::rolling::Builder::new()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix("relief")
                .filename_suffix("log")
                .max_log_files(5)
                .build(dir)
                .context("Failed to create log file appender")?;

            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            if LOG_GUARD.set(guard).is_err() {
                anyhow::bail!("Logging already initialized");
            }

            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_ansi(false)
                    .with_writer(file_writer),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Logger initialization failed")
}
