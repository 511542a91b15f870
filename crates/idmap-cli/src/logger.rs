use crate::{CliError, CliResult};

use std::fmt::Arguments;
use std::path::Path;
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use idmap_config::LoggingConfig;
use log::{Record, debug};

/// Initialize the global logger with fern.
///
/// Output goes to stderr so stdout stays reserved for command results, or
/// to `logging.file` in append mode. Colors apply to stderr only.
#[track_caller]
pub fn initialize(config: &LoggingConfig) -> CliResult<()> {
    let level_filter = config.level.0;
    let log_file = config.file.as_deref().map(Path::new);

    let dispatch = build_dispatch(log_file, config.colored)?;

    Dispatch::new()
        .level(level_filter)
        .chain(dispatch)
        .apply()
        .map_err(|e| CliError::logger(format!("Failed to initialize logger: {e}")))?;

    match log_file {
        Some(path) => debug!(
            "Logger initialized: level={:?}, file={}",
            level_filter,
            path.display()
        ),
        None => debug!("Logger initialized: level={:?}, stderr", level_filter),
    }

    Ok(())
}

/// Output dispatch for a log file or stderr, without installing it.
#[track_caller]
pub fn build_dispatch(log_file: Option<&Path>, colored: bool) -> CliResult<Dispatch> {
    if let Some(log_path) = log_file {
        // File output (no colors, plain format)
        let file = fern::log_file(log_path).map_err(|e| {
            CliError::logger(format!(
                "Failed to open log file {}: {e}",
                log_path.display()
            ))
        })?;

        return Ok(Dispatch::new().format(plain_format).chain(file));
    }

    if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        return Ok(Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = humantime::format_rfc3339(SystemTime::now()),
                    level = colors.color(record.level()),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0),
                ))
            })
            .chain(std::io::stderr()));
    }

    Ok(Dispatch::new().format(plain_format).chain(std::io::stderr()))
}

fn plain_format(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    out.finish(format_args!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        level = record.level(),
        message = message,
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}
