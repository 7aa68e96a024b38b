//! reqkit library: configurable HTTP requests with buffered, charset-aware responses
//!
//! This library sends one HTTP request per call from a declarative
//! [`RequestConfig`] (headers, query parameters, one of several body kinds,
//! proxy, cookie jar, timeouts) and returns a fully buffered
//! [`ResponseRecord`] whose text encoding is inferred from the response
//! headers and, for HTML, from `<meta charset>`. It can also replay a raw
//! request transcript copied from a browser's network inspector.
//!
//! # Example
//!
//! ```no_run
//! use reqkit::{RequestConfig, Session};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new().with_error_callback(|e| eprintln!("request failed: {e}"));
//!
//! let mut config = RequestConfig::new()
//!     .with_json(json!({"name": "reqkit"}))
//!     .with_timeout_millis(3000);
//! let response = session.post("https://example.com/api/items", &mut config).await?;
//!
//! println!("{} ({})", response.status_code(), response.text_encoding().name());
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod cookies;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod request;
pub mod response;
mod session;
pub mod xhr;

// Re-export public API
pub use cookies::{Cookie, CookieJar, MemoryCookieJar, SharedCookieJar};
pub use error_handling::{
    categorize_reqwest_error, classify_reqwest_error, error_chain_messages, BoxError,
    ErrorCallback, ErrorKind, InitializationError, RequestError,
};
pub use fetch::RequestState;
pub use request::{ExternalContent, KnownHeader, MultipartForm, PostBodyKind, RequestConfig};
pub use reqwest::Method;
pub use response::ResponseRecord;
pub use session::Session;
pub use xhr::{parse_raw_request, RawRequest};

/// Sends a GET request through a default [`Session`].
///
/// # Errors
///
/// Any classified [`RequestError`]; a default session has no error callback.
pub async fn get(url: &str, config: &mut RequestConfig) -> Result<ResponseRecord, RequestError> {
    Session::default().get(url, config).await
}

/// Sends a POST request through a default [`Session`].
///
/// # Errors
///
/// Any classified [`RequestError`]; a default session has no error callback.
pub async fn post(url: &str, config: &mut RequestConfig) -> Result<ResponseRecord, RequestError> {
    Session::default().post(url, config).await
}

/// Sends a request with any method through a default [`Session`].
///
/// # Errors
///
/// Any classified [`RequestError`]; a default session has no error callback.
pub async fn request(
    method: Method,
    url: &str,
    config: &mut RequestConfig,
) -> Result<ResponseRecord, RequestError> {
    Session::default().request(method, url, config).await
}

/// Parses and sends a raw request transcript through a default [`Session`].
///
/// # Errors
///
/// Any classified [`RequestError`]; a default session has no error callback.
pub async fn send_raw(transcript: &str) -> Result<ResponseRecord, RequestError> {
    Session::default().send_raw(transcript).await
}
