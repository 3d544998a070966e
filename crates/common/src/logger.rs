use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_LOG_FILE: &str = "pipeline.log";

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// With `log_file` set, every line also goes to that file (appended, never
/// rotated). Keep the returned guard alive until exit or buffered lines are lost.
pub fn setup_logger(
    default_level: &str,
    log_file: Option<&str>,
) -> Result<Option<WorkerGuard>, InitError> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Ok(directive) = "sqlx=warn".parse() {
        filter = filter.add_directive(directive);
    }

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                // .with_file(true)
                // .with_line_number(true)
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .compact(),
        )
        .with(file_layer)
        .try_init();

    Ok(guard)
}

/// Opens `path` for appending, creating missing parent directories.
pub fn file_appender(path: &str) -> Result<RollingFileAppender, InitError> {
    let path = Path::new(path);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
}
