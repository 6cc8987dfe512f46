//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG` and defaults to `info`. Log lines go to
//! stderr so that commands printing JSON keep stdout clean, or to a daily
//! rolling file when a log directory is configured.

use std::path::Path;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LogFormat;

pub const LOG_FILE_PREFIX: &str = "floorwatch.log";

fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Install the global subscriber.
///
/// The returned guard must be held for as long as file logging should keep
/// flushing; dropping it stops the background writer.
pub fn init_tracing(
    format: LogFormat,
    log_dir: Option<&Path>,
    default: LevelFilter,
) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(writer)
        .with_target(false);

    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
