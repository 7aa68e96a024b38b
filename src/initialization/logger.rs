//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::{IsTerminal, Write};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::Colorize;
use log::{Level, LevelFilter};

/// Initializes the logger with the specified level and format.
///
/// Logs go to stderr, either as a coloured `time level module: message` line
/// or as one JSON object per line.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter will override it for this crate's own
/// targets. Transport crates (`reqwest`, `hyper`) are capped at `info`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Wire-level detail for one request
/// RUST_LOG=trace reqkit https://example.com/
///
/// # CLI level takes precedence
/// RUST_LOG=debug reqkit https://example.com/ --log-level warn
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    // Logs share the terminal with the response body on stdout.
    colored::control::set_override(std::io::stderr().is_terminal());

    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(level);
    for transport in ["reqwest", "hyper", "hyper_util"] {
        builder.filter_module(transport, LevelFilter::Info);
    }
    builder.filter_module("reqkit", level);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            writeln!(
                buf,
                "{}",
                json_line(record.level(), record.target(), &record.args().to_string())
            )
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            writeln!(
                buf,
                "{}",
                plain_line(record.level(), record.target(), &record.args().to_string())
            )
        }),
    };

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Module path relative to the crate, so `reqkit::fetch::executor` reads `fetch::executor`.
fn short_target(target: &str) -> &str {
    target.strip_prefix("reqkit::").unwrap_or(target)
}

fn plain_line(level: Level, target: &str, message: &str) -> String {
    let tag = match level {
        Level::Error => "error".red().bold(),
        Level::Warn => "warn ".yellow(),
        Level::Info => "info ".green(),
        Level::Debug => "debug".blue(),
        Level::Trace => "trace".dimmed(),
    };
    format!(
        "{} {tag} {}: {message}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        short_target(target).cyan()
    )
}

fn json_line(level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": level.as_str(),
        "module": short_target(target),
        "msg": message,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_initialization_reports_error() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);

        // A logger is installed now, whichever call won.
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_json_line_fields() {
        let line = json_line(Level::Warn, "reqkit::response::decode", "unknown charset \"x\"");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["module"], "response::decode");
        assert_eq!(value["msg"], "unknown charset \"x\"");
        assert!(value["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_plain_line_shortens_own_targets() {
        let line = plain_line(Level::Debug, "reqkit::fetch::executor", "sending");
        assert!(line.contains("debug"));
        assert!(line.contains("fetch::executor"));
        assert!(!line.contains("reqkit::"));
        assert!(line.ends_with(": sending"));

        let line = plain_line(Level::Info, "hyper_util::client", "connected");
        assert!(line.contains("hyper_util::client"));
    }

    #[test]
    fn test_init_logger_all_levels_do_not_panic() {
        for level in [
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ] {
            let _ = init_logger_with(level, LogFormat::Plain);
        }
    }
}
