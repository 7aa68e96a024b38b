//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and logging configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use reqwest::Method;

use crate::config::constants::DEFAULT_TIMEOUT_MS;
use crate::error_handling::{ErrorKind, RequestError};
use crate::request::{KnownHeader, RequestConfig};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for the `reqkit` binary.
///
/// Either a target URL or `--raw <FILE>` must be given. With `--raw`, the
/// file holds a literal HTTP/1.1 request as copied from a browser's network
/// inspector and every other request-shaping flag is ignored.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reqkit",
    version,
    about = "Send an HTTP request from flags or a captured raw transcript"
)]
pub struct Opt {
    /// Target URL
    #[arg(required_unless_present = "raw")]
    pub url: Option<String>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Replay a raw HTTP/1.1 request transcript read from this file
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub raw: Option<PathBuf>,

    /// Extra header, `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Query parameter for GET or form field otherwise, `key=value` (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// JSON body (sent verbatim)
    #[arg(long, conflicts_with = "data")]
    pub json: Option<String>,

    /// Raw body
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Executor timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Do not sniff `<meta charset>` in HTML responses
    #[arg(long)]
    pub no_meta_encoding: bool,

    /// Return error statuses as normal responses instead of failing
    #[arg(long)]
    pub no_throw_status: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Parses `--method`, case-insensitively.
    ///
    /// # Errors
    ///
    /// `Other` when the method is not a valid HTTP token.
    pub fn request_method(&self) -> Result<Method, RequestError> {
        Method::from_bytes(self.method.trim().to_ascii_uppercase().as_bytes()).map_err(|e| {
            RequestError::with_source(
                ErrorKind::Other,
                format!("Invalid HTTP method '{}'", self.method),
                e,
            )
        })
    }

    /// Builds the request configuration described by the flags.
    ///
    /// `-H` values naming a known header go to the known-header map, anything
    /// else becomes a custom header. A `-p` value without `=` is a key with
    /// an empty value.
    ///
    /// # Errors
    ///
    /// `HttpRequestHeaderError` for a `-H` value without a `:`.
    pub fn request_config(&self) -> Result<RequestConfig, RequestError> {
        let mut config = RequestConfig::new()
            .with_timeout_millis(self.timeout_ms)
            .with_verify_tls_certificate(!self.insecure)
            .with_html_meta_encoding(!self.no_meta_encoding)
            .with_throw_on_error_status(!self.no_throw_status);

        for header in &self.headers {
            let (name, value) = header.split_once(':').ok_or_else(|| {
                RequestError::new(
                    ErrorKind::HttpRequestHeaderError,
                    format!("Header '{header}' is not in 'Name: value' form"),
                )
            })?;
            let (name, value) = (name.trim(), value.trim());
            match KnownHeader::from_raw_name(name) {
                Some(known) => config = config.with_header(known, value),
                None => config = config.with_custom_header(name, value),
            }
        }

        for param in &self.params {
            let (key, value) = param.split_once('=').unwrap_or((param.as_str(), ""));
            config = config.with_param(key, value);
        }

        if let Some(json) = &self.json {
            config = config.with_json(serde_json::Value::String(json.clone()));
        }
        if let Some(data) = &self.data {
            config = config.with_raw_body(data.clone().into_bytes());
        }

        Ok(config)
    }
}
