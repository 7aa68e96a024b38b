//! Error categorization.
//!
//! This module maps transport errors onto the fixed [`ErrorKind`] taxonomy.

use super::types::{ErrorKind, RequestError};

/// Categorizes a `reqwest::Error` into an `ErrorKind`.
///
/// Status errors are checked first, then the transport predicates. Timeouts
/// reported here come from the transport itself (connect or read budget), never
/// from the executor's own timer race.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The appropriate `ErrorKind` for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorKind {
    if error.is_status() {
        ErrorKind::HttpStatusCodeError
    } else if error.is_timeout() {
        ErrorKind::HttpRequestTimeout
    } else if error.is_connect()
        || error.is_request()
        || error.is_body()
        || error.is_decode()
        || error.is_redirect()
        || error.is_builder()
    {
        ErrorKind::HttpRequestError
    } else {
        ErrorKind::Other
    }
}

/// Wraps a `reqwest::Error` into a classified [`RequestError`].
///
/// `context` describes the stage that failed (e.g. "sending request").
pub fn classify_reqwest_error(error: reqwest::Error, context: &str) -> RequestError {
    let kind = categorize_reqwest_error(&error);
    let status = error.status().map(|s| s.as_u16());
    let message = match (kind, error.url()) {
        (ErrorKind::HttpRequestTimeout, Some(url)) => {
            format!("transport timed out while {context} {url}")
        }
        (_, Some(url)) => format!("error while {context} {url}"),
        (_, None) => format!("error while {context}"),
    };
    RequestError::with_source(kind, message, error).with_status_code(status)
}
