//! Error type definitions.
//!
//! This module defines the classified request error and the initialization
//! errors used by the binary.

use std::error::Error as StdError;
use std::fmt;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Boxed lower-level error carried inside a [`RequestError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// The fixed classification every request failure falls into.
///
/// Classification happens where the failure is detected (URL composition,
/// header assembly, body encoding, transport wait, response decode) and is
/// never inferred afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// A field required by the resolved body kind is missing or empty
    ArgumentNull,
    /// Status code outside the allow-list while `throw_on_error_status` is set
    HttpStatusCodeError,
    /// Transport-level timeout (distinct from the executor's own timer)
    HttpRequestTimeout,
    /// A header could not be constructed
    HttpRequestHeaderError,
    /// Malformed target URL, proxy URL, or transcript without `Host`
    UrlParseError,
    /// Cancellation observed while the request was in flight
    UserCancelled,
    /// Any other transport failure
    HttpRequestError,
    /// Unclassified
    Other,
}

impl ErrorKind {
    /// Returns the canonical name of the error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ArgumentNull => "ArgumentNull",
            ErrorKind::HttpStatusCodeError => "HTTPStatusCodeError",
            ErrorKind::HttpRequestTimeout => "HTTPRequestTimeout",
            ErrorKind::HttpRequestHeaderError => "HTTPRequestHeaderError",
            ErrorKind::UrlParseError => "UrlParseError",
            ErrorKind::UserCancelled => "UserCancelled",
            ErrorKind::HttpRequestError => "HTTPRequestError",
            ErrorKind::Other => "Other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified request failure.
///
/// Carries one [`ErrorKind`], a human-readable message, the HTTP status code
/// when the failure came from one, and optionally the lower-level error that
/// caused it (reachable through [`std::error::Error::source`]).
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct RequestError {
    kind: ErrorKind,
    message: String,
    status_code: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl RequestError {
    /// Creates a classified error without a wrapped cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// Creates a classified error wrapping a lower-level cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            source: Some(source.into()),
        }
    }

    /// Creates an `HttpStatusCodeError` for a status outside the allow-list.
    pub fn status(code: u16) -> Self {
        Self {
            kind: ErrorKind::HttpStatusCodeError,
            message: format!("HTTP status code indicates a failed request: {code}"),
            status_code: Some(code),
            source: None,
        }
    }

    /// Shorthand for an `ArgumentNull` error naming the missing field.
    pub(crate) fn argument_null(field: &str, body_kind: &str) -> Self {
        Self::new(
            ErrorKind::ArgumentNull,
            format!("`{field}` is missing or empty but the request body kind is {body_kind}"),
        )
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message (without the kind prefix).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP status code, for `HttpStatusCodeError`.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub(crate) fn with_status_code(mut self, code: Option<u16>) -> Self {
        self.status_code = code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::ArgumentNull.as_str(), "ArgumentNull");
        assert_eq!(
            ErrorKind::HttpStatusCodeError.as_str(),
            "HTTPStatusCodeError"
        );
        assert_eq!(ErrorKind::HttpRequestTimeout.as_str(), "HTTPRequestTimeout");
        assert_eq!(ErrorKind::UrlParseError.as_str(), "UrlParseError");
    }

    #[test]
    fn test_all_error_kinds_have_distinct_names() {
        let names: Vec<&str> = ErrorKind::iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), 8);
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_status_error_carries_code() {
        let err = RequestError::status(404);
        assert_eq!(err.kind(), ErrorKind::HttpStatusCodeError);
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().starts_with("HTTPStatusCodeError: "));
    }

    #[test]
    fn test_with_source_exposes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = RequestError::with_source(ErrorKind::HttpRequestError, "request failed", io);
        assert_eq!(err.message(), "request failed");
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "socket closed");
    }

    #[test]
    fn test_argument_null_names_field() {
        let err = RequestError::argument_null("multipart", "form_data");
        assert_eq!(err.kind(), ErrorKind::ArgumentNull);
        assert!(err.message().contains("multipart"));
        assert!(err.message().contains("form_data"));
    }
}
