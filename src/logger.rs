use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{debug, Record};

use crate::config::LogLevel;

fn level_colors() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .trace(Color::Magenta)
        .debug(Color::Blue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
}

/// `[timestamp - LEVEL] message`, optionally followed by `[file:line]`.
fn write_line(
    out: FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &Record<'_>,
    level: impl fmt::Display,
    with_location: bool,
) {
    let date = humantime::format_rfc3339(SystemTime::now());
    if with_location {
        out.finish(format_args!(
            "[{date} - {level}] {message} [{}:{}]",
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
        ))
    } else {
        out.finish(format_args!("[{date} - {level}] {message}"))
    }
}

/// Initialize logger with fern.
///
/// With `log_file` set, lines are appended to that file; otherwise they go
/// to stderr so command output on stdout stays clean. `colored` only applies
/// to stderr.
pub fn initialize(log_level: LogLevel, log_file: Option<&Path>, colored: bool) -> anyhow::Result<()> {
    let dispatch = Dispatch::new().level(log_level.0);

    let dispatch = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("failed to open log file {}", log_path.display()))?;

            dispatch
                .format(|out, message, record| {
                    write_line(out, message, record, record.level(), true)
                })
                .chain(file)
        }
        None => {
            let colors = colored.then(level_colors);
            dispatch
                .format(move |out, message, record| match &colors {
                    Some(colors) => {
                        write_line(out, message, record, colors.color(record.level()), true)
                    }
                    None => write_line(out, message, record, record.level(), false),
                })
                .chain(std::io::stderr())
        }
    };

    dispatch.apply().context("failed to initialize logger")?;

    debug!("Logger initialized: level={}", log_level.0);
    Ok(())
}
